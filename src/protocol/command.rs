//! Command definitions
//!
//! Represents parsed commands from clients.

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Unconditionally store a value
    Set {
        key: String,
        ttl_secs: u64,
        value: Vec<u8>,
        /// Suppress the response for this command
        noreply: bool,
    },

    /// Store a value only if `expected_version` matches the current version
    Cas {
        key: String,
        ttl_secs: u64,
        expected_version: u64,
        value: Vec<u8>,
    },

    /// Fetch a value
    Get { key: String },

    /// Fetch only an entry's version
    GetMeta { key: String },

    /// Remove an entry
    Delete { key: String },
}

impl Command {
    /// The key this command addresses, used for ownership routing
    pub fn key(&self) -> &str {
        match self {
            Command::Set { key, .. }
            | Command::Cas { key, .. }
            | Command::Get { key }
            | Command::GetMeta { key }
            | Command::Delete { key } => key,
        }
    }

    /// Whether the client asked for the response to be suppressed
    pub fn is_noreply(&self) -> bool {
        matches!(self, Command::Set { noreply: true, .. })
    }
}
