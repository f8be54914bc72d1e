use std::io::Cursor;
use crate::error::TraceError;
use crate::trace::{AccessClass, AccessKind, AccessRecord, TraceReader};

#[test]
fn access_kinds_map_to_classes() {
    assert_eq!(AccessKind::Write.access_class(), AccessClass::Store);
    assert_eq!(AccessKind::Read.access_class(), AccessClass::Load);
    assert_eq!(AccessKind::InstructionFetch.access_class(), AccessClass::Load);
}

#[test]
fn parses_generated_trace_lines() {
    assert_eq!(AccessRecord::parse("0 R 0x1f40"), Some(AccessRecord::new(0, 0x1f40, AccessKind::Read)));
    assert_eq!(AccessRecord::parse("  1234 I 0x7FFFF000  "), Some(AccessRecord::new(1234, 0x7fff_f000, AccessKind::InstructionFetch)));
    assert_eq!(AccessRecord::parse("2 W 0XABC"), Some(AccessRecord::new(2, 0xabc, AccessKind::Write)));
}

#[test]
fn rejects_malformed_lines() {
    assert_eq!(AccessRecord::parse("R 0x10"), None);
    assert_eq!(AccessRecord::parse("1 r 0x10"), None);
    assert_eq!(AccessRecord::parse("1 R 10"), None);
    assert_eq!(AccessRecord::parse("1 R 0x"), None);
    // Doesn't fit in a 32 bit address
    assert_eq!(AccessRecord::parse("1 R 0x100000000"), None);
    assert_eq!(AccessRecord::parse("99999999999 R 0x10"), None);
}

#[test]
fn reader_skips_blanks_and_markers() {
    let input = "1 R 0x10\n\n# comment\n2 W 0x20\n#eof\n";
    let records: Vec<AccessRecord> = TraceReader::new(Cursor::new(input)).collect::<Result<_, _>>().unwrap();
    assert_eq!(records, vec![
        AccessRecord::new(1, 0x10, AccessKind::Read),
        AccessRecord::new(2, 0x20, AccessKind::Write),
    ]);
}

#[test]
fn reader_reports_line_numbers() {
    let input = "1 R 0x10\n\nnonsense\n2 W 0x20";
    let mut reader = TraceReader::new(Cursor::new(input));
    assert!(reader.next().unwrap().is_ok());
    match reader.next() {
        Some(Err(TraceError::MalformedRecord { line_number, line })) => {
            assert_eq!(line_number, 3);
            assert_eq!(line, "nonsense");
        }
        other => panic!("expected a malformed record, got {other:?}"),
    }
    // Carries on after the bad line, even without a trailing newline
    assert_eq!(reader.next().unwrap().unwrap(), AccessRecord::new(2, 0x20, AccessKind::Write));
    assert!(reader.next().is_none());
}
