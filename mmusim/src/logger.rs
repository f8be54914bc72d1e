use mmulib::simulator::AccessEvent;

fn yes_no(answer: bool) -> &'static str {
    if answer { "yes" } else { "no" }
}

/// The log lines describing one access
pub fn format_event(event: &AccessEvent) -> Vec<String> {
    let record = &event.record;
    let mut lines = vec![
        format!(
            "Process[{}]: {} 0x{:X} (page: {}, offset: {})",
            record.process_id,
            record.access_kind.verb(),
            record.address,
            event.page_number,
            event.offset
        ),
        format!("\tTLB hit? {}", yes_no(event.tlb_hit())),
    ];
    if !event.tlb_hit() {
        lines.push(format!("\tPage fault? {}", yes_no(event.page_fault())));
        lines.push(format!("\tTLB eviction? {}", yes_no(event.tlb_eviction.is_some())));
        if let Some(page) = event.tlb_eviction {
            lines.push(format!("\tpage {page} evicted from TLB"));
        }
    }
    if let Some(eviction) = event.memory_eviction {
        lines.push(format!(
            "\tProcess {} page {} ({}) evicted from memory",
            eviction.evicted_pid,
            eviction.evicted_page_number,
            if eviction.evicted_was_dirty { "dirty" } else { "clean" }
        ));
    }
    lines.push(format!("\tpage {} in frame {}", event.page_number, event.frame_number));
    lines
}

/// Logs one access at info level
pub fn log_event(event: &AccessEvent) {
    for line in format_event(event) {
        tracing::info!("{line}");
    }
}

#[cfg(test)]
mod test {
    use mmulib::page_table::EvictionResult;
    use mmulib::simulator::{AccessEvent, Translation};
    use mmulib::trace::{AccessKind, AccessRecord};
    use super::format_event;

    #[test]
    fn formats_a_fault_with_evictions() {
        let event = AccessEvent {
            record: AccessRecord::new(2, 0x3abc, AccessKind::Write),
            page_number: 3,
            offset: 0xabc,
            translation: Translation::PageFault,
            tlb_eviction: Some(7),
            memory_eviction: Some(EvictionResult { evicted_page_number: 9, evicted_pid: 1, evicted_was_dirty: true }),
            frame_number: 0,
        };
        assert_eq!(format_event(&event), vec![
            "Process[2]: writes 0x3ABC (page: 3, offset: 2748)",
            "\tTLB hit? no",
            "\tPage fault? yes",
            "\tTLB eviction? yes",
            "\tpage 7 evicted from TLB",
            "\tProcess 1 page 9 (dirty) evicted from memory",
            "\tpage 3 in frame 0",
        ]);
    }

    #[test]
    fn tlb_hits_skip_the_page_table_lines() {
        let event = AccessEvent {
            record: AccessRecord::new(1, 0x10, AccessKind::InstructionFetch),
            page_number: 0,
            offset: 0x10,
            translation: Translation::TlbHit,
            tlb_eviction: None,
            memory_eviction: None,
            frame_number: 4,
        };
        assert_eq!(format_event(&event), vec![
            "Process[1]: fetches 0x10 (page: 0, offset: 16)",
            "\tTLB hit? yes",
            "\tpage 0 in frame 4",
        ]);
    }
}
