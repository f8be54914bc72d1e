use std::collections::HashSet;
use crate::error::ConfigError;
use crate::page_table::{EvictionResult, LookupResult, PageKey, PageTable, PageTableTrait};
use crate::replacement_policies::{FirstInFirstOut, LeastFrequentlyUsed, LeastRecentlyUsed, MostFrequentlyUsed, MostRecentlyUsed};

const FRAME: u32 = 4096;

fn page(n: u32) -> u32 {
    n * FRAME
}

#[test]
fn rejects_bad_geometry() {
    assert!(matches!(
        PageTable::new(65536, 3000, FirstInFirstOut::default()),
        Err(ConfigError::FrameSizeNotPowerOfTwo(3000))
    ));
    assert!(matches!(
        PageTable::new(65536 + 2048, 4096, FirstInFirstOut::default()),
        Err(ConfigError::FrameSizeMismatch { memory_size: 67584, frame_size: 4096 })
    ));
    assert!(matches!(
        PageTable::new(0, 4096, FirstInFirstOut::default()),
        Err(ConfigError::NoFrames(0))
    ));
    assert!(matches!(
        PageTable::new(65536, 0, FirstInFirstOut::default()),
        Err(ConfigError::FrameSizeNotPowerOfTwo(0))
    ));
}

#[test]
fn geometry_matches_frame_size() {
    let table = PageTable::new(65536, 4096, LeastRecentlyUsed::default()).unwrap();
    let geometry = table.geometry();
    assert_eq!(geometry.max_frames(), 16);
    assert_eq!(geometry.offset_bits(), 12);
    assert_eq!(geometry.page_bits(), 20);
    assert_eq!(geometry.max_pages(), 1 << 20);
    assert_eq!(table.page_number(0xdead_beef), 0xdeadb);
    assert_eq!(table.offset(0xdead_beef), 0xeef);
}

#[test]
fn byte_sized_frames_use_every_bit_for_the_page() {
    let table = PageTable::new(16, 1, LeastRecentlyUsed::default()).unwrap();
    assert_eq!(table.geometry().page_bits(), 32);
    assert_eq!(table.geometry().max_pages(), 1 << 32);
    assert_eq!(table.page_number(0xffff_ffff), 0xffff_ffff);
    assert_eq!(table.offset(0xffff_ffff), 0);
}

#[test]
fn miss_then_insert_then_hit() {
    let mut table = PageTable::new(65536, 4096, LeastRecentlyUsed::default()).unwrap();
    assert_eq!(table.lookup(0x1234, 1), None);
    assert_eq!(table.resident_count(), 0);
    assert_eq!(table.insert(0x1234, 1), None);
    assert_eq!(table.lookup(0x1234, 1), Some(LookupResult { page_number: 1, frame_number: 0, offset: 0x234 }));
    // Same page number, different process
    assert_eq!(table.lookup(0x1234, 2), None);
    assert_eq!(table.insert(0x1000, 2), None);
    assert_eq!(table.lookup(0x1fff, 2).map(|r| r.frame_number), Some(1));
}

#[test]
fn free_frames_are_used_lowest_first() {
    let mut table = PageTable::new(4 * FRAME, FRAME, FirstInFirstOut::default()).unwrap();
    for n in 0..4 {
        assert_eq!(table.insert(page(10 + n), 1), None);
    }
    let frames: Vec<u32> = table.resident_pages().into_iter().map(|(_, frame)| frame).collect();
    assert_eq!(frames, vec![0, 1, 2, 3]);
    assert_eq!(table.lookup(page(12), 1).map(|r| r.frame_number), Some(2));
}

#[test]
fn eviction_reuses_the_victims_frame() {
    let mut table = PageTable::new(2 * FRAME, FRAME, FirstInFirstOut::default()).unwrap();
    assert_eq!(table.insert(page(1), 1), None);
    assert_eq!(table.insert(page(2), 1), None);
    table.set_dirty(page(1), 1);
    let eviction = table.insert(page(3), 2);
    assert_eq!(eviction, Some(EvictionResult { evicted_page_number: 1, evicted_pid: 1, evicted_was_dirty: true }));
    assert_eq!(table.lookup(page(1), 1), None);
    assert_eq!(table.lookup(page(3), 2).map(|r| r.frame_number), Some(0));
    assert_eq!(table.resident_count(), 2);
}

#[test]
fn replacement_is_global_across_processes() {
    let mut table = PageTable::new(2 * FRAME, FRAME, LeastRecentlyUsed::default()).unwrap();
    table.insert(page(1), 1);
    table.insert(page(1), 2);
    // Process 1's page is more recently used, so process 2 loses its page to process 1's fault
    table.lookup(page(1), 1);
    let eviction = table.insert(page(5), 1).unwrap();
    assert_eq!(eviction.evicted_pid, 2);
    assert_eq!(eviction.evicted_page_number, 1);
    assert!(!eviction.evicted_was_dirty);
}

#[test]
fn reinserted_pages_start_clean() {
    let mut table = PageTable::new(FRAME, FRAME, FirstInFirstOut::default()).unwrap();
    table.insert(page(0), 1);
    table.set_dirty(page(0), 1);
    assert!(table.insert(page(1), 1).unwrap().evicted_was_dirty);
    assert!(!table.insert(page(0), 1).unwrap().evicted_was_dirty);
    assert!(!table.insert(page(1), 1).unwrap().evicted_was_dirty);
}

#[test]
fn lru_evicts_least_recently_touched() {
    let mut table = PageTable::new(3 * FRAME, FRAME, LeastRecentlyUsed::default()).unwrap();
    for n in 0..3 {
        table.insert(page(n), 1);
    }
    table.lookup(page(0), 1);
    table.lookup(page(1), 1);
    assert_eq!(table.insert(page(9), 1).unwrap().evicted_page_number, 2);
    assert_eq!(table.insert(page(8), 1).unwrap().evicted_page_number, 0);
}

#[test]
fn mru_evicts_most_recently_touched() {
    let mut table = PageTable::new(3 * FRAME, FRAME, MostRecentlyUsed::default()).unwrap();
    for n in 0..3 {
        table.insert(page(n), 1);
    }
    table.lookup(page(0), 1);
    assert_eq!(table.insert(page(9), 1).unwrap().evicted_page_number, 0);
    // The incoming page's key comes from the same clock, so it's now the most recent
    assert_eq!(table.insert(page(8), 1).unwrap().evicted_page_number, 9);
}

#[test]
fn fifo_ignores_hits() {
    let mut table = PageTable::new(2 * FRAME, FRAME, FirstInFirstOut::default()).unwrap();
    table.insert(page(0), 1);
    table.insert(page(1), 1);
    for _ in 0..5 {
        table.lookup(page(0), 1);
    }
    assert_eq!(table.insert(page(2), 1).unwrap().evicted_page_number, 0);
    assert_eq!(table.insert(page(3), 1).unwrap().evicted_page_number, 1);
}

#[test]
fn lfu_and_mfu_count_hits() {
    let mut lfu = PageTable::new(2 * FRAME, FRAME, LeastFrequentlyUsed).unwrap();
    let mut mfu = PageTable::new(2 * FRAME, FRAME, MostFrequentlyUsed).unwrap();
    for table in [&mut lfu as &mut dyn PageTableTrait, &mut mfu] {
        table.insert(page(0), 1);
        table.insert(page(1), 1);
        table.lookup(page(1), 1);
        table.lookup(page(1), 1);
        table.lookup(page(0), 1);
    }
    assert_eq!(lfu.insert(page(2), 1).unwrap().evicted_page_number, 0);
    assert_eq!(mfu.insert(page(2), 1).unwrap().evicted_page_number, 1);
}

#[test]
fn ties_go_to_the_lowest_frame() {
    let mut table = PageTable::new(3 * FRAME, FRAME, LeastFrequentlyUsed).unwrap();
    for n in 0..3 {
        table.insert(page(n), 1);
    }
    assert_eq!(table.insert(page(7), 1).unwrap().evicted_page_number, 0);
}

#[test]
fn residency_stays_within_the_frame_pool() {
    let mut table = PageTable::new(4 * FRAME, FRAME, LeastRecentlyUsed::default()).unwrap();
    for n in 0..20 {
        let pid = n % 3;
        if table.lookup(page(n), pid).is_none() {
            let before = table.resident_count();
            let eviction = table.insert(page(n), pid);
            assert_eq!(table.resident_count(), if eviction.is_some() { before } else { before + 1 });
        }
        let pages = table.resident_pages();
        let frames: HashSet<u32> = pages.iter().map(|(_, frame)| *frame).collect();
        let keys: HashSet<PageKey> = pages.iter().map(|(key, _)| *key).collect();
        assert_eq!(frames.len(), pages.len());
        assert_eq!(keys.len(), pages.len());
        assert!(pages.len() <= 4);
    }
}

#[test]
#[should_panic(expected = "isn't resident")]
fn set_dirty_on_missing_page_panics() {
    let mut table = PageTable::new(FRAME, FRAME, FirstInFirstOut::default()).unwrap();
    table.set_dirty(page(3), 1);
}

#[test]
#[should_panic(expected = "already resident")]
fn double_insert_panics() {
    let mut table = PageTable::new(2 * FRAME, FRAME, FirstInFirstOut::default()).unwrap();
    table.insert(page(3), 1);
    table.insert(page(3), 1);
}
