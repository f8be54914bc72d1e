use std::convert::Infallible;
use std::time::{Duration, Instant};
use serde::Serialize;
use crate::config::Settings;
use crate::error::ConfigError;
use crate::page_table::{EvictionResult, GenericPageTable, LookupResult, PageTableTrait};
use crate::stats::SimulationResult;
use crate::tlb::TranslationLookasideBuffer;
use crate::trace::{AccessClass, AccessRecord};

/// How far down the hierarchy an access had to go to be translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Translation {
    /// The TLB held the translation
    TlbHit,
    /// The TLB missed, the page was resident
    PageHit,
    /// The TLB missed and the page had to be brought in from disk
    PageFault,
}

/// Everything observed while simulating one access, for loggers to format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessEvent {
    pub record: AccessRecord,
    pub page_number: u32,
    pub offset: u32,
    pub translation: Translation,
    /// Virtual page thrown out of the TLB when the new translation was cached
    pub tlb_eviction: Option<u32>,
    /// Page thrown out of memory to service a page fault
    pub memory_eviction: Option<EvictionResult>,
    pub frame_number: u32,
}

impl AccessEvent {
    pub fn tlb_hit(&self) -> bool {
        self.translation == Translation::TlbHit
    }

    pub fn page_fault(&self) -> bool {
        self.translation == Translation::PageFault
    }
}

/// Latencies charged for each level of the hierarchy
#[derive(Debug, Clone, Copy)]
struct Latencies {
    tlb: u64,
    memory: u64,
    disk: u64,
}

/// The simulator replays access records through the TLB and page table, and collects results.
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly. The TLB and page table persist across calls.
#[derive(Debug)]
pub struct Simulator {
    page_table: GenericPageTable,
    tlb: TranslationLookasideBuffer,
    latencies: Latencies,
    last_process: Option<u32>,
    result: SimulationResult,
    simulation_time: Duration,
}

impl Simulator {
    /// Creates a new simulator for the given settings
    ///
    /// # Arguments
    ///
    /// * `settings`: The simulation settings, usually loaded from a settings file
    ///
    /// returns: Result<Simulator, ConfigError>, failing if the memory geometry is invalid
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Self::with_page_table(
            GenericPageTable::from_settings(settings)?,
            settings,
        ))
    }

    /// Creates a simulator around an already built page table. The latencies and TLB size are
    /// taken from the settings
    pub fn with_page_table(page_table: GenericPageTable, settings: &Settings) -> Self {
        Self {
            page_table,
            tlb: TranslationLookasideBuffer::new(settings.tlb_size as usize),
            latencies: Latencies {
                tlb: settings.tlb_latency,
                memory: settings.memory_latency,
                disk: settings.disk_latency,
            },
            last_process: None,
            result: SimulationResult::default(),
            simulation_time: Duration::new(0, 0),
        }
    }

    /// Simulates a single access
    ///
    /// The TLB is checked first, then the page table. A page fault brings the page in, possibly
    /// evicting another (whose TLB entry is dropped along with it), and the translation is looked up again before it's cached in the TLB.
    /// Per-process counters and the running latency are updated along the way. The overall stats
    /// are not; they are refreshed when one of the simulate methods finishes.
    ///
    /// # Arguments
    ///
    /// * `record`: The access
    ///
    /// returns: AccessEvent, describing what happened
    ///
    /// # Panics
    ///
    /// If the page table can't find a page immediately after inserting it
    pub fn step(&mut self, record: AccessRecord) -> AccessEvent {
        let pid = record.process_id;
        let address = record.address;
        let stats = self.result.processes.entry(pid).or_default();
        stats.total_references += 1;
        self.result.total_accesses += 1;

        if self.last_process.is_some_and(|last| last != pid) {
            tracing::debug!(from = ?self.last_process, to = pid, "context switch, flushing TLB");
            self.tlb.flush();
        }
        self.last_process = Some(pid);

        let page_number = self.page_table.page_number(address);
        let offset = self.page_table.offset(address);
        let mut event = AccessEvent {
            record,
            page_number,
            offset,
            translation: Translation::TlbHit,
            tlb_eviction: None,
            memory_eviction: None,
            frame_number: 0,
        };

        self.result.total_latency += self.latencies.tlb;
        if let Some(frame) = self.tlb.lookup(page_number) {
            event.frame_number = frame;
            tracing::trace!(pid, address, page_number, frame, "TLB hit");
            return event;
        }
        stats.tlb_misses += 1;

        self.result.total_latency += self.latencies.memory;
        let translation = match self.page_table.lookup(address, pid) {
            Some(translation) => {
                event.translation = Translation::PageHit;
                translation
            }
            None => {
                event.translation = Translation::PageFault;
                stats.page_faults += 1;
                self.result.total_latency += self.latencies.memory + self.latencies.disk;
                if let Some(eviction) = self.page_table.insert(address, pid) {
                    if eviction.evicted_was_dirty {
                        // Written back before the frame is reused
                        self.result.total_latency += self.latencies.disk;
                        stats.dirty_evictions += 1;
                    } else {
                        stats.clean_evictions += 1;
                    }
                    // Only the running process has translations in the TLB
                    if eviction.evicted_pid == pid && self.tlb.invalidate(eviction.evicted_page_number) {
                        tracing::debug!(page = eviction.evicted_page_number, "invalidated evicted page in TLB");
                    }
                    event.memory_eviction = Some(eviction);
                }
                Self::lookup_resident(&mut self.page_table, address, pid)
            }
        };

        if record.access_kind.access_class() == AccessClass::Store {
            self.page_table.set_dirty(address, pid);
        }
        self.result.total_latency += self.latencies.tlb;
        event.tlb_eviction = self.tlb.insert(page_number, translation.frame_number);
        event.frame_number = translation.frame_number;
        tracing::trace!(pid, address, page_number, frame = translation.frame_number, fault = event.page_fault(), "TLB miss");
        event
    }

    fn lookup_resident(page_table: &mut GenericPageTable, address: u32, pid: u32) -> LookupResult {
        match page_table.lookup(address, pid) {
            Some(translation) => translation,
            None => panic!("page {:#x} of process {pid} isn't resident straight after insertion", page_table.page_number(address)),
        }
    }

    /// Simulates every record in order
    ///
    /// # Arguments
    ///
    /// * `records`: The access records, usually from a TraceReader
    ///
    /// returns: &SimulationResult
    ///
    /// # Examples
    ///
    /// ```
    /// use mmulib::config::{ReplacementPolicyConfig, Settings};
    /// use mmulib::simulator::Simulator;
    /// use mmulib::trace::{AccessKind, AccessRecord};
    /// let settings = Settings {
    ///     physical_memory_size: 65536,
    ///     frame_size: 4096,
    ///     memory_latency: 10,
    ///     tlb_size: 4,
    ///     tlb_latency: 1,
    ///     disk_latency: 100,
    ///     logging_output: false,
    ///     page_replacement: ReplacementPolicyConfig::Lru,
    ///     random_seed: None,
    /// };
    /// let mut simulator = Simulator::new(&settings).unwrap();
    /// let trace = [AccessRecord::new(1, 0x1000, AccessKind::Read); 2];
    /// let result = simulator.simulate(trace);
    /// assert_eq!(result.processes[&1].page_faults, 1);
    /// assert_eq!(result.processes[&1].tlb_misses, 1);
    /// ```
    pub fn simulate<I>(&mut self, records: I) -> &SimulationResult
    where
        I: IntoIterator<Item = AccessRecord>,
    {
        self.simulate_observed(records, |_| {})
    }

    /// Simulates every record in order, handing each access's event to `observer`
    pub fn simulate_observed<I, F>(&mut self, records: I, observer: F) -> &SimulationResult
    where
        I: IntoIterator<Item = AccessRecord>,
        F: FnMut(&AccessEvent),
    {
        let records = records.into_iter().map(Ok::<AccessRecord, Infallible>);
        match self.try_simulate(records, observer) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Simulates records which may have failed to parse, stopping at the first error
    ///
    /// Everything before the error stays simulated, and the overall stats are refreshed either
    /// way
    pub fn try_simulate<I, E, F>(&mut self, records: I, mut observer: F) -> Result<&SimulationResult, E>
    where
        I: IntoIterator<Item = Result<AccessRecord, E>>,
        F: FnMut(&AccessEvent),
    {
        let start = Instant::now();
        let mut outcome = Ok(());
        for record in records {
            match record {
                Ok(record) => observer(&self.step(record)),
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        self.simulation_time += start.elapsed();
        self.result.aggregate();
        outcome.map(|_| &self.result)
    }

    /// The results so far. The overall stats reflect the last completed simulate call
    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn page_table(&self) -> &GenericPageTable {
        &self.page_table
    }

    pub fn tlb(&self) -> &TranslationLookasideBuffer {
        &self.tlb
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }
}
