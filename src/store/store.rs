//! Sharded entry store
//!
//! HashMap shards behind `parking_lot::RwLock`, selected by key hash.

use std::collections::hash_map::{DefaultHasher, Entry as Slot};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use parking_lot::RwLock;

use crate::error::{MeshError, Result};
use super::Entry;

/// Default number of lock shards
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// Concurrency-safe mapping from key to versioned, expirable value
///
/// ## Concurrency Model
///
/// - Operations on the same key serialize on that key's shard lock; the
///   version increment and the value store happen under one write-lock
///   scope, so racing writers each observe version = previous + 1 with no
///   lost updates.
/// - Operations on different keys contend only when the keys hash to the
///   same shard; with many keys, shards keep cross-key traffic parallel.
/// - Locks are held for the duration of one entry mutation only, never
///   across I/O.
///
/// Expiration is lazy: an expired entry is invisible to every operation
/// but stays resident (keeping its version counter) until overwritten or
/// deleted.
pub struct Store {
    shards: Vec<RwLock<HashMap<String, Entry>>>,
}

impl Store {
    /// Create a store with the default shard count
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

    /// Create a store with a specific shard count (minimum 1)
    pub fn with_shards(count: usize) -> Self {
        let count = count.max(1);
        let shards = (0..count).map(|_| RwLock::new(HashMap::new())).collect();
        Self { shards }
    }

    /// Get a value and its version
    ///
    /// Fails with `KeyNotFound` if the key was never written or has expired.
    pub fn get(&self, key: &str) -> Result<(Vec<u8>, u64)> {
        let now = Instant::now();
        let shard = self.shard_for(key).read();
        match shard.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                Ok((entry.value.clone(), entry.version))
            }
            _ => Err(MeshError::KeyNotFound),
        }
    }

    /// Get only the version of an entry, without the value
    pub fn get_meta(&self, key: &str) -> Result<u64> {
        let now = Instant::now();
        let shard = self.shard_for(key).read();
        match shard.get(key) {
            Some(entry) if !entry.is_expired(now) => Ok(entry.version),
            _ => Err(MeshError::KeyNotFound),
        }
    }

    /// Set a value, creating the entry if absent
    ///
    /// Returns the new version: 1 for a brand-new key, previous + 1
    /// otherwise (including over an expired entry, whose counter is kept
    /// so versions are never reused).
    pub fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> u64 {
        let now = Instant::now();
        let mut shard = self.shard_for(key).write();
        match shard.entry(key.to_string()) {
            Slot::Occupied(mut slot) => slot.get_mut().overwrite(value, ttl_secs, now),
            Slot::Vacant(slot) => slot.insert(Entry::new(value, ttl_secs, now)).version,
        }
    }

    /// Conditionally set a value if `expected` matches the current version
    ///
    /// Fails with `KeyNotFound` if the key is absent or expired, and with
    /// `VersionMismatch` if `expected` differs from the stored version; in
    /// both cases the entry is left exactly as it was.
    pub fn compare_and_swap(
        &self,
        key: &str,
        expected: u64,
        value: Vec<u8>,
        ttl_secs: u64,
    ) -> Result<u64> {
        let now = Instant::now();
        let mut shard = self.shard_for(key).write();
        match shard.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                if entry.version != expected {
                    return Err(MeshError::VersionMismatch);
                }
                Ok(entry.overwrite(value, ttl_secs, now))
            }
            _ => Err(MeshError::KeyNotFound),
        }
    }

    /// Delete an entry
    ///
    /// Fails with `KeyNotFound` if the key is absent or expired. Deleting
    /// a resident-but-expired entry also removes it, but still reports
    /// `KeyNotFound` since the entry was already invisible.
    pub fn delete(&self, key: &str) -> Result<()> {
        let now = Instant::now();
        let mut shard = self.shard_for(key).write();
        match shard.remove(key) {
            Some(entry) if !entry.is_expired(now) => Ok(()),
            // expired entries are reclaimed but reported as absent
            Some(_) => Err(MeshError::KeyNotFound),
            None => Err(MeshError::KeyNotFound),
        }
    }

    /// Total number of resident entries, expired ones included
    pub fn entry_count(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    /// Number of lock shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: &str) -> &RwLock<HashMap<String, Entry>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
