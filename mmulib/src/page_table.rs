use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::address::PageGeometry;
use crate::config::{ReplacementPolicyConfig, Settings};
use crate::error::ConfigError;
use crate::replacement_policies::{FirstInFirstOut, LeastFrequentlyUsed, LeastRecentlyUsed, MostFrequentlyUsed, MostRecentlyUsed, RandomReplacement, ReplacementPolicy};

/// Identifies a logical page across all processes. Two processes referencing the same page number
/// own two distinct pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageKey {
    pub process_id: u32,
    pub page_number: u32,
}

/// A successful translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupResult {
    pub page_number: u32,
    pub frame_number: u32,
    pub offset: u32,
}

/// The page which was thrown out of memory to make room for an insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionResult {
    pub evicted_page_number: u32,
    pub evicted_pid: u32,
    pub evicted_was_dirty: bool,
}

/// A generic trait for page tables
///
/// Like the replacement policies, this is used through static dispatch; GenericPageTable picks the
/// concrete table at runtime
///
/// Misses and page faults are ordinary results, not errors. Calls which can only happen through a
/// sequencing mistake by the caller panic instead.
pub trait PageTableTrait {
    /// The address split used by this table
    fn geometry(&self) -> &PageGeometry;

    fn page_number(&self, address: u32) -> u32 {
        self.geometry().page_number(address)
    }

    fn offset(&self, address: u32) -> u32 {
        self.geometry().offset(address)
    }

    /// Translates an address for a process, returning None on a page fault
    ///
    /// On a hit the replacement policy is told the page was used. A miss changes nothing
    ///
    /// # Arguments
    ///
    /// * `address`: The virtual address
    /// * `pid`: The process the address belongs to
    ///
    /// returns: Option<LookupResult>
    fn lookup(&mut self, address: u32, pid: u32) -> Option<LookupResult>;

    /// Marks the resident page holding `address` as written to
    ///
    /// # Panics
    ///
    /// If the page is not resident. Only call this after a lookup or insertion for the same access
    fn set_dirty(&mut self, address: u32, pid: u32);

    /// Brings a page into memory, evicting another page if every frame is in use
    ///
    /// The victim is chosen among the pages of every process. The new page starts clean, with the
    /// policy's initial key
    ///
    /// # Arguments
    ///
    /// * `address`: The virtual address being brought in
    /// * `pid`: The process the address belongs to
    ///
    /// returns: Option<EvictionResult>, None when a free frame was used
    ///
    /// # Panics
    ///
    /// If the page is already resident
    fn insert(&mut self, address: u32, pid: u32) -> Option<EvictionResult>;

    /// Every resident page and the frame holding it, in frame order
    fn resident_pages(&self) -> Vec<(PageKey, u32)>;

    fn resident_count(&self) -> usize;
}

/// One resident page. The slot it's stored in is its frame number
#[derive(Debug, Clone, Copy)]
struct PageTableEntry<K> {
    page: PageKey,
    dirty: bool,
    ordering_key: K,
}

/// A page table parameterised by a replacement policy
///
/// Entries live in a dense array indexed by frame number, and a map from page to frame finds them.
/// Updating an entry is plain assignment, and an evicted page's frame is handed straight to the
/// incoming page. Free frames are kept on a stack so the lowest numbered free frame goes first.
#[derive(Debug)]
pub struct PageTable<P: ReplacementPolicy> {
    geometry: PageGeometry,
    frames: Vec<Option<PageTableEntry<P::Key>>>,
    resident: HashMap<PageKey, u32>,
    free_frames: Vec<u32>,
    replacement_policy: P,
}

impl<P: ReplacementPolicy> PageTable<P> {
    pub fn new(memory_size: u32, frame_size: u32, policy: P) -> Result<Self, ConfigError> {
        let geometry = PageGeometry::new(memory_size, frame_size)?;
        let max_frames = geometry.max_frames();
        Ok(Self {
            geometry,
            frames: vec![None; max_frames as usize],
            resident: HashMap::with_capacity(max_frames as usize),
            free_frames: (0..max_frames).rev().collect(),
            replacement_policy: policy,
        })
    }

    fn key_for(&self, address: u32, pid: u32) -> PageKey {
        PageKey {
            process_id: pid,
            page_number: self.geometry.page_number(address),
        }
    }

    /// Chooses a victim, removes it and returns its frame along with what was evicted
    fn evict(&mut self) -> (u32, EvictionResult) {
        let resident_keys = self.frames.iter().flatten().map(|entry| (entry.page, entry.ordering_key));
        let victim = match self.replacement_policy.select_victim(resident_keys) {
            Some(victim) => victim,
            None => panic!("page table has no free frames but no resident pages either"),
        };
        let frame = match self.resident.remove(&victim) {
            Some(frame) => frame,
            None => panic!("replacement policy chose {victim:?}, which isn't resident"),
        };
        let evicted = match self.frames[frame as usize].take() {
            Some(entry) => entry,
            None => panic!("frame {frame} is mapped to {victim:?} but holds no entry"),
        };
        tracing::debug!(process = victim.process_id, page = victim.page_number, frame, dirty = evicted.dirty, "evicted page from memory");
        (frame, EvictionResult {
            evicted_page_number: victim.page_number,
            evicted_pid: victim.process_id,
            evicted_was_dirty: evicted.dirty,
        })
    }
}

impl<P: ReplacementPolicy> PageTableTrait for PageTable<P> {
    fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    fn lookup(&mut self, address: u32, pid: u32) -> Option<LookupResult> {
        let key = self.key_for(address, pid);
        let frame = *self.resident.get(&key)?;
        let entry = self.frames[frame as usize].as_mut()?;
        entry.ordering_key = self.replacement_policy.touch(entry.ordering_key);
        Some(LookupResult {
            page_number: key.page_number,
            frame_number: frame,
            offset: self.geometry.offset(address),
        })
    }

    fn set_dirty(&mut self, address: u32, pid: u32) {
        let key = self.key_for(address, pid);
        let entry = self.resident.get(&key).and_then(|frame| self.frames[*frame as usize].as_mut());
        match entry {
            Some(entry) => entry.dirty = true,
            None => panic!("set_dirty called for {key:?}, which isn't resident"),
        }
    }

    fn insert(&mut self, address: u32, pid: u32) -> Option<EvictionResult> {
        let key = self.key_for(address, pid);
        assert!(!self.resident.contains_key(&key), "insert called for {key:?}, which is already resident");
        let (frame, eviction) = match self.free_frames.pop() {
            Some(frame) => (frame, None),
            None => {
                let (frame, eviction) = self.evict();
                (frame, Some(eviction))
            }
        };
        let ordering_key = self.replacement_policy.initial_key();
        self.frames[frame as usize] = Some(PageTableEntry {
            page: key,
            dirty: false,
            ordering_key,
        });
        let _ = self.resident.insert(key, frame);
        eviction
    }

    fn resident_pages(&self) -> Vec<(PageKey, u32)> {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame, entry)| entry.as_ref().map(|entry| (entry.page, frame as u32)))
            .collect()
    }

    fn resident_count(&self) -> usize {
        self.resident.len()
    }
}

/// Enum for every kind of page table provided by the library
///
/// Trait objects would need the policy's key type erased. Branching explicitly over the concrete
/// types keeps every table monomorphised and lets the compiler inline the policy calls
#[derive(Debug)]
pub enum GenericPageTable {
    FirstInFirstOut(PageTable<FirstInFirstOut>),
    LeastRecentlyUsed(PageTable<LeastRecentlyUsed>),
    MostRecentlyUsed(PageTable<MostRecentlyUsed>),
    LeastFrequentlyUsed(PageTable<LeastFrequentlyUsed>),
    MostFrequentlyUsed(PageTable<MostFrequentlyUsed>),
    Random(PageTable<RandomReplacement>),
}

impl GenericPageTable {
    /// Creates a page table with the geometry and replacement policy named in the settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let memory_size = settings.physical_memory_size;
        let frame_size = settings.frame_size;
        Ok(match settings.page_replacement {
            ReplacementPolicyConfig::Fifo => {
                GenericPageTable::from(PageTable::new(memory_size, frame_size, FirstInFirstOut::default())?)
            }
            ReplacementPolicyConfig::Lru => {
                GenericPageTable::from(PageTable::new(memory_size, frame_size, LeastRecentlyUsed::default())?)
            }
            ReplacementPolicyConfig::Mru => {
                GenericPageTable::from(PageTable::new(memory_size, frame_size, MostRecentlyUsed::default())?)
            }
            ReplacementPolicyConfig::Lfu => {
                GenericPageTable::from(PageTable::new(memory_size, frame_size, LeastFrequentlyUsed)?)
            }
            ReplacementPolicyConfig::Mfu => {
                GenericPageTable::from(PageTable::new(memory_size, frame_size, MostFrequentlyUsed)?)
            }
            ReplacementPolicyConfig::Random => {
                GenericPageTable::from(PageTable::new(memory_size, frame_size, RandomReplacement::new(settings.random_seed))?)
            }
        })
    }
}

impl From<PageTable<FirstInFirstOut>> for GenericPageTable {
    fn from(value: PageTable<FirstInFirstOut>) -> Self {
        Self::FirstInFirstOut(value)
    }
}

impl From<PageTable<LeastRecentlyUsed>> for GenericPageTable {
    fn from(value: PageTable<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl From<PageTable<MostRecentlyUsed>> for GenericPageTable {
    fn from(value: PageTable<MostRecentlyUsed>) -> Self {
        Self::MostRecentlyUsed(value)
    }
}

impl From<PageTable<LeastFrequentlyUsed>> for GenericPageTable {
    fn from(value: PageTable<LeastFrequentlyUsed>) -> Self {
        Self::LeastFrequentlyUsed(value)
    }
}

impl From<PageTable<MostFrequentlyUsed>> for GenericPageTable {
    fn from(value: PageTable<MostFrequentlyUsed>) -> Self {
        Self::MostFrequentlyUsed(value)
    }
}

impl From<PageTable<RandomReplacement>> for GenericPageTable {
    fn from(value: PageTable<RandomReplacement>) -> Self {
        Self::Random(value)
    }
}

/// Forwards a call to whichever concrete table is inside
macro_rules! dispatch {
    ($table:expr, $t:ident => $call:expr) => {
        match $table {
            GenericPageTable::FirstInFirstOut($t) => $call,
            GenericPageTable::LeastRecentlyUsed($t) => $call,
            GenericPageTable::MostRecentlyUsed($t) => $call,
            GenericPageTable::LeastFrequentlyUsed($t) => $call,
            GenericPageTable::MostFrequentlyUsed($t) => $call,
            GenericPageTable::Random($t) => $call,
        }
    };
}

impl PageTableTrait for GenericPageTable {
    fn geometry(&self) -> &PageGeometry {
        dispatch!(self, t => t.geometry())
    }

    fn lookup(&mut self, address: u32, pid: u32) -> Option<LookupResult> {
        dispatch!(self, t => t.lookup(address, pid))
    }

    fn set_dirty(&mut self, address: u32, pid: u32) {
        dispatch!(self, t => t.set_dirty(address, pid))
    }

    fn insert(&mut self, address: u32, pid: u32) -> Option<EvictionResult> {
        dispatch!(self, t => t.insert(address, pid))
    }

    fn resident_pages(&self) -> Vec<(PageKey, u32)> {
        dispatch!(self, t => t.resident_pages())
    }

    fn resident_count(&self) -> usize {
        dispatch!(self, t => t.resident_count())
    }
}
