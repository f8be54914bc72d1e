use std::fmt::Write;
use mmulib::address::PageGeometry;
use mmulib::config::Settings;
use mmulib::stats::{ProcessStats, SimulationResult};

/// The settings and derived geometry, printed before the trace is run
pub fn pre_simulation(settings: &Settings, geometry: &PageGeometry) -> String {
    let mut out = String::new();
    // Writing to a String can't fail
    let _ = writeln!(out, "Page bits: {}", geometry.page_bits());
    let _ = writeln!(out, "Offset bits: {}", geometry.offset_bits());
    let _ = writeln!(out, "TLB size: {}", settings.tlb_size);
    let _ = writeln!(out, "TLB latency (ticks): {}", settings.tlb_latency);
    let _ = writeln!(out, "Physical memory (bytes): {}", geometry.memory_size());
    let _ = writeln!(out, "Physical frame size (bytes): {}", geometry.frame_size());
    let _ = writeln!(out, "Number of physical frames: {}", geometry.max_frames());
    let _ = writeln!(out, "Memory latency (ticks): {}", settings.memory_latency);
    let _ = writeln!(out, "Number of page table entries: {}", geometry.max_pages());
    let _ = writeln!(out, "Page replacement strategy: {}", settings.page_replacement);
    let _ = writeln!(out, "Disk latency (ticks): {}", settings.disk_latency);
    let _ = write!(out, "Logging: {}", if settings.logging_output { "on" } else { "off" });
    out
}

fn process_block(out: &mut String, title: &str, stats: &ProcessStats) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "\tMemory references: {}", stats.total_references);
    let _ = writeln!(out, "\tTLB misses: {}", stats.tlb_misses);
    let _ = writeln!(out, "\tPage faults: {}", stats.page_faults);
    let _ = writeln!(out, "\tClean evictions: {}", stats.clean_evictions);
    let _ = writeln!(out, "\tDirty evictions: {}", stats.dirty_evictions);
    let _ = writeln!(out, "\tTotal evictions: {}", stats.total_evictions());
    let _ = writeln!(out, "\tPercentage dirty evictions: {:.2}%", stats.dirty_eviction_pct());
}

/// Per-process statistics, then the overall statistics and total latency
pub fn summary(result: &SimulationResult) -> String {
    let mut out = String::new();
    for (pid, stats) in &result.processes {
        process_block(&mut out, &format!("Process {pid}:"), stats);
    }
    process_block(&mut out, "Overall:", &result.overall);
    let _ = writeln!(out, "Total accesses: {}", result.total_accesses);
    let _ = write!(out, "Total latency (ticks): {}", result.total_latency);
    out
}
