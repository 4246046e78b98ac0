//! Error types for MeshKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using MeshError
pub type Result<T> = std::result::Result<T, MeshError>;

/// Unified error type for MeshKV operations
#[derive(Debug, Error)]
pub enum MeshError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// Key absent or expired. Surfaced to the client as `ERR_NOT_FOUND`.
    #[error("Key not found")]
    KeyNotFound,

    /// CAS precondition failed. Surfaced as `ERR_VERSION_MISMATCH`; the
    /// stored entry is left untouched.
    #[error("Version mismatch")]
    VersionMismatch,

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
