//! # MMULib
//!
//! MMULib is a library for simulating a memory management unit
//!
//! It replays a trace of virtual memory accesses through a translation lookaside buffer backed by
//! a page table, with a pluggable page replacement policy, and reports per-process statistics and
//! the total latency of the run
//!
//! The simulation itself does no I/O. Loading settings, parsing traces and reading trace files are
//! provided as separate modules for the command line front end and the tests

/// Splitting addresses into page numbers and offsets
pub mod address;

/// Contains definitions for the settings file and JSON settings formats
pub mod config;

/// Error types for settings and trace input
pub mod error;

/// Helpers for reading trace files from disk
pub mod io;

/// Contains the page table, with a trait for page tables and a utility enum covering every
/// replacement policy
pub mod page_table;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Contains the simulator used to replay a trace through the TLB and page table
pub mod simulator;

/// Per-process statistics and the simulation result
pub mod stats;

/// The translation lookaside buffer
pub mod tlb;

/// Access records and the trace file parser
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
