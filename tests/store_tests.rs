//! Store Tests
//!
//! Entry store semantics: versioning, CAS, TTL expiry, concurrency.

use std::thread;
use std::time::Duration;

use meshkv::{MeshError, Store};

// =============================================================================
// Basic Semantics
// =============================================================================

#[test]
fn test_unwritten_key_is_not_found() {
    let store = Store::new();

    assert!(matches!(store.get("ghost"), Err(MeshError::KeyNotFound)));
    assert!(matches!(store.get_meta("ghost"), Err(MeshError::KeyNotFound)));
    assert!(matches!(store.delete("ghost"), Err(MeshError::KeyNotFound)));
}

#[test]
fn test_first_set_yields_version_one() {
    let store = Store::new();

    let version = store.set("alpha", b"I am ALPHA".to_vec(), 0);
    assert_eq!(version, 1);

    let (value, version) = store.get("alpha").unwrap();
    assert_eq!(value, b"I am ALPHA");
    assert_eq!(version, 1);
}

#[test]
fn test_sequential_sets_increment_version_by_one() {
    let store = Store::new();

    for expected in 1..=5u64 {
        let version = store.set("gamma", format!("v{}", expected).into_bytes(), 0);
        assert_eq!(version, expected);
    }

    assert_eq!(store.get_meta("gamma").unwrap(), 5);
}

#[test]
fn test_delete_removes_entry() {
    let store = Store::new();

    store.set("beta", b"I am BETA".to_vec(), 0);
    store.delete("beta").unwrap();

    assert!(matches!(store.get("beta"), Err(MeshError::KeyNotFound)));
    assert!(matches!(store.delete("beta"), Err(MeshError::KeyNotFound)));
}

// =============================================================================
// Compare-and-Swap
// =============================================================================

#[test]
fn test_cas_succeeds_with_matching_version() {
    let store = Store::new();

    // write gamma exactly 5 times
    for i in 0..5 {
        store.set("gamma", format!("v{}", i).into_bytes(), 0);
    }

    let version = store
        .compare_and_swap("gamma", 5, b"I am BETA now".to_vec(), 0)
        .unwrap();
    assert_eq!(version, 6);
    assert_eq!(store.get_meta("gamma").unwrap(), 6);
}

#[test]
fn test_cas_mismatch_leaves_entry_unchanged() {
    let store = Store::new();

    store.set("delta", b"original".to_vec(), 0);

    let result = store.compare_and_swap("delta", 42, b"clobbered".to_vec(), 0);
    assert!(matches!(result, Err(MeshError::VersionMismatch)));

    let (value, version) = store.get("delta").unwrap();
    assert_eq!(value, b"original");
    assert_eq!(version, 1);
}

#[test]
fn test_cas_on_missing_key_is_not_found() {
    let store = Store::new();

    let result = store.compare_and_swap("ghost", 0, b"x".to_vec(), 0);
    assert!(matches!(result, Err(MeshError::KeyNotFound)));
}

// =============================================================================
// Expiration
// =============================================================================

#[test]
fn test_entry_expires_after_ttl() {
    let store = Store::new();

    store.set("theta", b"I am THETA".to_vec(), 1);
    assert!(store.get("theta").is_ok());

    thread::sleep(Duration::from_millis(1100));

    assert!(matches!(store.get("theta"), Err(MeshError::KeyNotFound)));
    assert!(matches!(store.get_meta("theta"), Err(MeshError::KeyNotFound)));
    assert!(matches!(
        store.compare_and_swap("theta", 1, b"x".to_vec(), 0),
        Err(MeshError::KeyNotFound)
    ));
}

#[test]
fn test_zero_ttl_does_not_expire() {
    let store = Store::new();

    store.set("alpha", b"I am ALPHA".to_vec(), 0);
    thread::sleep(Duration::from_millis(50));
    assert!(store.get("alpha").is_ok());
}

#[test]
fn test_set_over_expired_entry_continues_versions() {
    let store = Store::new();

    store.set("theta", b"first".to_vec(), 1);
    store.set("theta", b"second".to_vec(), 1);
    thread::sleep(Duration::from_millis(1100));

    // invisible to reads, but the counter is never reused
    assert!(store.get("theta").is_err());
    let version = store.set("theta", b"third".to_vec(), 0);
    assert_eq!(version, 3);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_writers_never_lose_a_version() {
    let store = Store::new();
    let writers = 8;
    let writes_per_thread = 200;

    crossbeam::thread::scope(|scope| {
        for _ in 0..writers {
            scope.spawn(|_| {
                for _ in 0..writes_per_thread {
                    store.set("hot", b"contended".to_vec(), 0);
                }
            });
        }
    })
    .unwrap();

    // N total writes must yield exactly version N: no lost updates,
    // no duplicate version numbers
    assert_eq!(
        store.get_meta("hot").unwrap(),
        (writers * writes_per_thread) as u64
    );
}

#[test]
fn test_concurrent_cas_applies_exactly_one_winner_per_version() {
    let store = Store::new();
    store.set("counter", b"0".to_vec(), 0);

    let contenders = 8;

    crossbeam::thread::scope(|scope| {
        for _ in 0..contenders {
            scope.spawn(|_| {
                // retry loop: each iteration re-reads the version, so every
                // contender eventually lands exactly one write
                loop {
                    let version = store.get_meta("counter").unwrap();
                    match store.compare_and_swap("counter", version, b"won".to_vec(), 0) {
                        Ok(_) => break,
                        Err(MeshError::VersionMismatch) => continue,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            });
        }
    })
    .unwrap();

    // 1 seed write + one successful CAS per contender
    assert_eq!(store.get_meta("counter").unwrap(), 1 + contenders as u64);
}

#[test]
fn test_writes_to_distinct_keys_proceed_in_parallel() {
    let store = Store::with_shards(16);

    crossbeam::thread::scope(|scope| {
        for i in 0..16 {
            let key = format!("key-{}", i);
            let store = &store;
            scope.spawn(move |_| {
                for _ in 0..100 {
                    store.set(&key, b"v".to_vec(), 0);
                }
            });
        }
    })
    .unwrap();

    for i in 0..16 {
        assert_eq!(store.get_meta(&format!("key-{}", i)).unwrap(), 100);
    }
}
