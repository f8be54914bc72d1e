use std::collections::HashMap;

/// A cached translation, stamped with the logical time it was last used
#[derive(Debug, Clone, Copy)]
struct TlbEntry {
    physical_frame: u32,
    last_used: u64,
}

/// Fully associative translation lookaside buffer with least recently used replacement
///
/// Entries are keyed by virtual page alone; the buffer doesn't know which process a translation
/// belongs to, so it must be flushed whenever the running process changes. A capacity of zero
/// disables it: every lookup misses and inserts are ignored.
///
/// Every lookup hit and insertion advances the clock before stamping, so no two entries ever share
/// a stamp and the least recently used entry is always unique.
#[derive(Debug)]
pub struct TranslationLookasideBuffer {
    entries: HashMap<u32, TlbEntry>,
    capacity: usize,
    time: u64,
}

impl TranslationLookasideBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity + 1),
            capacity,
            time: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.time += 1;
        self.time
    }

    /// Looks up a virtual page, refreshing its recency on a hit
    ///
    /// # Examples
    ///
    /// ```
    /// use mmulib::tlb::TranslationLookasideBuffer;
    /// let mut tlb = TranslationLookasideBuffer::new(1);
    /// assert_eq!(tlb.lookup(3), None);
    /// tlb.insert(3, 7);
    /// assert_eq!(tlb.lookup(3), Some(7));
    /// ```
    pub fn lookup(&mut self, virtual_page: u32) -> Option<u32> {
        if self.capacity == 0 {
            return None;
        }
        let entry = self.entries.get_mut(&virtual_page)?;
        self.time += 1;
        entry.last_used = self.time;
        Some(entry.physical_frame)
    }

    /// Adds or overwrites a translation, returning the virtual page evicted to make room, if any
    ///
    /// # Arguments
    ///
    /// * `virtual_page`: The virtual page number
    /// * `physical_frame`: The frame it's mapped to
    ///
    /// returns: Option<u32>
    pub fn insert(&mut self, virtual_page: u32, physical_frame: u32) -> Option<u32> {
        if self.capacity == 0 {
            return None;
        }
        let last_used = self.tick();
        let _ = self.entries.insert(virtual_page, TlbEntry { physical_frame, last_used });
        if self.entries.len() <= self.capacity {
            return None;
        }
        let victim = self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(page, _)| *page)?;
        let _ = self.entries.remove(&victim);
        tracing::debug!(page = victim, "evicted page from TLB");
        Some(victim)
    }

    /// Drops the translation for one virtual page, if cached. The clock doesn't move
    pub fn invalidate(&mut self, virtual_page: u32) -> bool {
        self.entries.remove(&virtual_page).is_some()
    }

    /// Drops every translation and restarts the clock
    pub fn flush(&mut self) {
        self.entries.clear();
        self.time = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
