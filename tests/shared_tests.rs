//! SharedStore Tests
//!
//! Tests verify:
//! - Operations pass through to the wrapped store
//! - Clones address the same table
//! - Concurrent writers and reapers from several threads

use std::thread;

use ttlkv::{Instant, ManualClock, SharedStore, Store};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_shared() -> (ManualClock, SharedStore<ManualClock>) {
    let clock = ManualClock::new(Instant::from_secs(0));
    let shared = SharedStore::new(Store::empty(clock.clone()));
    (clock, shared)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_shared_basic_operations() {
    let (clock, shared) = setup_shared();

    shared.set("a", "val1", 0);
    shared.set("b", "val2", 3);

    assert_eq!(shared.get(b"a"), Some(b"val1".to_vec()));
    assert_eq!(shared.get_many_sorted(b"", 5).len(), 2);

    clock.advance(4);
    assert_eq!(shared.get(b"b"), None);
    assert_eq!(
        shared.remove_one_expired_entry(),
        Some((b"b".to_vec(), b"val2".to_vec()))
    );

    assert!(shared.remove(b"a"));
    assert!(shared.is_empty());
}

#[test]
fn test_shared_clones_see_same_table() {
    let (_clock, shared) = setup_shared();
    let other = shared.clone();

    other.set("k", "v", 0);

    assert_eq!(shared.get(b"k"), Some(b"v".to_vec()));
    assert_eq!(shared.len(), 1);
}

#[test]
fn test_shared_with_groups_operations() {
    let (_clock, shared) = setup_shared();

    let previous = shared.with(|store| {
        let previous = store.get(b"counter");
        store.set("counter", "1", 0);
        previous
    });

    assert_eq!(previous, None);
    assert_eq!(shared.get(b"counter"), Some(b"1".to_vec()));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_shared_concurrent_writers() {
    let (_clock, shared) = setup_shared();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    shared.set(format!("t{}-{:03}", t, i), "v", 0);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.len(), 1000);
    assert_eq!(shared.get_many_sorted(b"t3-", 1000).len(), 250);
}

#[test]
fn test_shared_concurrent_reapers_reclaim_each_entry_once() {
    let (clock, shared) = setup_shared();

    for i in 0..500 {
        shared.set(format!("key{:03}", i), "v", 1);
    }
    clock.advance(2);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut reclaimed = 0usize;
                while shared.remove_one_expired_entry().is_some() {
                    reclaimed += 1;
                }
                reclaimed
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(total, 500);
    assert!(shared.is_empty());
}
