//! # MeshKV
//!
//! A distributed, in-memory key-value cache cluster with:
//! - Versioned entries for optimistic concurrency (compare-and-swap)
//! - Per-entry TTL with lazy expiration
//! - Partitioned keyspace ownership with client redirects
//! - Text-based TCP protocol (simplified memcached)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one thread per connection)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Handler                           │
//! │        (decode → route → dispatch → respond)                 │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!     ┌─────────────┐               ┌─────────────┐
//!     │   Router    │               │    Store    │
//!     │ (key→owner) │               │  (sharded,  │
//!     └─────────────┘               │  versioned) │
//!                                   └─────────────┘
//! ```
//!
//! A command whose key is owned by another node never reaches the store;
//! the handler answers `ERR_REDIRECT <host> <port>` and the client resends
//! the same command to the named owner.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod cluster;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MeshError, Result};
pub use config::Config;
pub use store::Store;
pub use cluster::{NodeAddr, Placement, Router};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of MeshKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
