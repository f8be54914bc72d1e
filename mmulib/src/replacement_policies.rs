use std::fmt::Debug;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use crate::page_table::PageKey;

/// A generic trait for implementing new page replacement policies. Can be used to parameterise a
/// PageTable.
///
/// Each resident page carries an ordering key owned by the policy. The page table hands the key
/// back to the policy whenever the page is hit, and shows the policy every resident page's key
/// when a victim is needed, but never interprets the key itself.
pub trait ReplacementPolicy {
    /// The per-page ordering key
    type Key: Copy + Debug;

    /// Produces the key for a page which has just been inserted
    fn initial_key(&mut self) -> Self::Key;

    /// Updates the key of a page when it is hit. Not called on insertion.
    ///
    /// Not applicable for some policies, a default which leaves the key unchanged is provided
    ///
    /// # Arguments
    ///
    /// * `prev_key`: The key the page held before the hit
    ///
    /// returns: Self::Key
    fn touch(&mut self, prev_key: Self::Key) -> Self::Key {
        prev_key
    }

    /// Picks the page to evict out of every resident page.
    ///
    /// The page table always presents pages in the same order for the same history, so ties are
    /// broken by taking the first page found. Returns None only when nothing is resident.
    ///
    /// # Arguments
    ///
    /// * `pages`: Every resident page, paired with its key
    ///
    /// returns: Option<PageKey>
    fn select_victim<I>(&mut self, pages: I) -> Option<PageKey>
    where
        I: Iterator<Item = (PageKey, Self::Key)>;
}

/// First page holding the smallest key
fn least<I: Iterator<Item = (PageKey, u64)>>(pages: I) -> Option<PageKey> {
    pages
        .reduce(|best, next| if next.1 < best.1 { next } else { best })
        .map(|(page, _)| page)
}

/// First page holding the largest key
fn most<I: Iterator<Item = (PageKey, u64)>>(pages: I) -> Option<PageKey> {
    pages
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .map(|(page, _)| page)
}

/// A logical clock, advanced each time it's read
#[derive(Debug, Default)]
struct Clock {
    time: u64,
}

impl Clock {
    fn tick(&mut self) -> u64 {
        let now = self.time;
        self.time += 1;
        now
    }
}

/// Evicts the page which was inserted first. Hits don't change anything.
#[derive(Debug, Default)]
pub struct FirstInFirstOut {
    sequence: Clock,
}

impl ReplacementPolicy for FirstInFirstOut {
    type Key = u64;

    fn initial_key(&mut self) -> u64 {
        self.sequence.tick()
    }

    fn select_victim<I>(&mut self, pages: I) -> Option<PageKey>
    where
        I: Iterator<Item = (PageKey, u64)>,
    {
        least(pages)
    }
}

/// Least Recently Used replacement policy
///
/// This implementation keeps a logical clock, which is read on every insertion and every hit. A
/// page's key is the time it was last used, so the victim is simply the smallest key
#[derive(Debug, Default)]
pub struct LeastRecentlyUsed {
    clock: Clock,
}

impl ReplacementPolicy for LeastRecentlyUsed {
    type Key = u64;

    fn initial_key(&mut self) -> u64 {
        self.clock.tick()
    }

    fn touch(&mut self, _prev_key: u64) -> u64 {
        self.clock.tick()
    }

    fn select_victim<I>(&mut self, pages: I) -> Option<PageKey>
    where
        I: Iterator<Item = (PageKey, u64)>,
    {
        least(pages)
    }
}

/// Most Recently Used replacement policy. Same clock as LRU, evicts the largest key instead
#[derive(Debug, Default)]
pub struct MostRecentlyUsed {
    clock: Clock,
}

impl ReplacementPolicy for MostRecentlyUsed {
    type Key = u64;

    fn initial_key(&mut self) -> u64 {
        self.clock.tick()
    }

    fn touch(&mut self, _prev_key: u64) -> u64 {
        self.clock.tick()
    }

    fn select_victim<I>(&mut self, pages: I) -> Option<PageKey>
    where
        I: Iterator<Item = (PageKey, u64)>,
    {
        most(pages)
    }
}

/// Least frequently used replacement policy. The key counts hits since insertion
#[derive(Debug, Default)]
pub struct LeastFrequentlyUsed;

impl ReplacementPolicy for LeastFrequentlyUsed {
    type Key = u64;

    fn initial_key(&mut self) -> u64 {
        0
    }

    fn touch(&mut self, prev_key: u64) -> u64 {
        prev_key + 1
    }

    fn select_victim<I>(&mut self, pages: I) -> Option<PageKey>
    where
        I: Iterator<Item = (PageKey, u64)>,
    {
        least(pages)
    }
}

/// Most frequently used replacement policy
#[derive(Debug, Default)]
pub struct MostFrequentlyUsed;

impl ReplacementPolicy for MostFrequentlyUsed {
    type Key = u64;

    fn initial_key(&mut self) -> u64 {
        0
    }

    fn touch(&mut self, prev_key: u64) -> u64 {
        prev_key + 1
    }

    fn select_victim<I>(&mut self, pages: I) -> Option<PageKey>
    where
        I: Iterator<Item = (PageKey, u64)>,
    {
        most(pages)
    }
}

/// Evicts a uniformly random resident page. Pages carry no key.
///
/// Seeding makes a run reproducible, otherwise the generator is seeded from the OS
#[derive(Debug)]
pub struct RandomReplacement {
    rng: StdRng,
}

impl RandomReplacement {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl ReplacementPolicy for RandomReplacement {
    type Key = ();

    fn initial_key(&mut self) {}

    fn select_victim<I>(&mut self, pages: I) -> Option<PageKey>
    where
        I: Iterator<Item = (PageKey, ())>,
    {
        pages.map(|(page, _)| page).choose(&mut self.rng)
    }
}
