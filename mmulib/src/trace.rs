use std::io::BufRead;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::error::TraceError;

lazy_static! {
    static ref RECORD_PATTERN: Regex = Regex::new(r"^\s*(?P<pid>\d+)\s+(?P<kind>[RWI])\s+0[xX](?P<address>[0-9a-fA-F]+)\s*$").unwrap();
}

/// What a trace record does with its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKind {
    Read,
    Write,
    InstructionFetch,
}

/// Whether an access leaves its page dirty. Only stores do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    Load,
    Store,
}

impl AccessKind {
    pub fn access_class(&self) -> AccessClass {
        match self {
            AccessKind::Write => AccessClass::Store,
            AccessKind::Read | AccessKind::InstructionFetch => AccessClass::Load,
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "R" => Some(AccessKind::Read),
            "W" => Some(AccessKind::Write),
            "I" => Some(AccessKind::InstructionFetch),
            _ => None,
        }
    }

    /// Verb describing the access, for log output
    pub fn verb(&self) -> &'static str {
        match self {
            AccessKind::Read => "reads",
            AccessKind::Write => "writes",
            AccessKind::InstructionFetch => "fetches",
        }
    }
}

/// A single memory reference from a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub process_id: u32,
    pub address: u32,
    pub access_kind: AccessKind,
}

impl AccessRecord {
    pub fn new(process_id: u32, address: u32, access_kind: AccessKind) -> Self {
        Self { process_id, address, access_kind }
    }

    /// Parses a trace line of the form `<pid> <R|W|I> 0x<address>`
    ///
    /// Returns None if the line doesn't match, or the address doesn't fit in 32 bits
    ///
    /// # Examples
    ///
    /// ```
    /// use mmulib::trace::{AccessKind, AccessRecord};
    /// let record = AccessRecord::parse("     3 W 0x7ffe10").unwrap();
    /// assert_eq!(record, AccessRecord::new(3, 0x7ffe10, AccessKind::Write));
    /// assert!(AccessRecord::parse("3 X 0x10").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let captures = RECORD_PATTERN.captures(line)?;
        Some(Self {
            process_id: captures["pid"].parse().ok()?,
            address: u32::from_str_radix(&captures["address"], 16).ok()?,
            access_kind: AccessKind::from_code(&captures["kind"])?,
        })
    }
}

/// Reads access records from a trace, lazily, one line at a time
///
/// Blank lines and lines starting with `#` (such as the `#eof` marker) are skipped. A line which
/// isn't a valid record produces a TraceError carrying its line number; iteration can carry on
/// past it.
pub struct TraceReader<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<AccessRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;
            let line = self.buffer.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            return Some(AccessRecord::parse(line).ok_or_else(|| TraceError::MalformedRecord {
                line_number: self.line_number,
                line: line.to_string(),
            }));
        }
    }
}
