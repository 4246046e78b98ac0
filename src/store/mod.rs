//! Store Module
//!
//! In-memory entry store with versioning and TTL expiry.
//!
//! ## Responsibilities
//! - Versioned get/set/cas/getm/delete keyed by string
//! - Per-key linearizable version counter (no lost or duplicate versions)
//! - Lazy TTL expiration evaluated on every access
//! - Cross-key parallelism via a fixed number of lock shards
//!
//! ## Data Structure Choice
//! A fixed array of `parking_lot::RwLock<HashMap>` shards, selected by key
//! hash. Writers contend only within one shard; map-structural mutation
//! (inserting a brand-new key) and entry mutation happen under the same
//! shard write lock, so the version counter and value can never diverge.

mod entry;
mod store;

pub use entry::Entry;
pub use store::Store;
