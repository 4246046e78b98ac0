//! Entry definitions
//!
//! The stored record for one key: value, version, expiry.

use std::time::{Duration, Instant};

/// A single stored entry
#[derive(Debug, Clone)]
pub struct Entry {
    /// Opaque byte payload
    pub value: Vec<u8>,

    /// Monotonically increasing write counter; 1 after the first write
    pub version: u64,

    /// Absolute expiry instant; `None` means never expires
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Create the first version of an entry
    pub fn new(value: Vec<u8>, ttl_secs: u64, now: Instant) -> Self {
        Self {
            value,
            version: 1,
            expires_at: Self::expiry(ttl_secs, now),
        }
    }

    /// Overwrite value and TTL, advancing the version by exactly one
    ///
    /// The version continues even when the previous value had already
    /// expired, so a version number is never reused for the key.
    pub fn overwrite(&mut self, value: Vec<u8>, ttl_secs: u64, now: Instant) -> u64 {
        self.value = value;
        self.version += 1;
        self.expires_at = Self::expiry(ttl_secs, now);
        self.version
    }

    /// Whether the entry is invisible at `now`
    ///
    /// The boundary is inclusive: an entry written with TTL `t` is absent
    /// for any access at `write + t` or later.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(at) => now >= at,
            None => false,
        }
    }

    /// Compute the absolute expiry for a TTL; zero means never
    fn expiry(ttl_secs: u64, now: Instant) -> Option<Instant> {
        if ttl_secs == 0 {
            None
        } else {
            Some(now + Duration::from_secs(ttl_secs))
        }
    }
}
