//! Protocol Module
//!
//! Defines the text wire protocol for client-server communication.
//!
//! ## Protocol Format
//!
//! Commands are a header line terminated by `\r\n`; write-style commands
//! carry a fixed-length binary payload followed by a trailing `\r\n`:
//!
//! ```text
//! set <key> <ttl> <bytes> [noreply]\r\n<payload>\r\n
//! cas <key> <ttl> <version> <bytes>\r\n<payload>\r\n
//! get <key>\r\n
//! getm <key>\r\n
//! delete <key>\r\n
//! ```
//!
//! ### Responses
//! ```text
//! OK <version>\r\n
//! VALUE <bytes>\r\n<payload>\r\n      (get)
//! VALUE <version>\r\n                 (getm)
//! DELETED\r\n
//! ERR_NOT_FOUND\r\n
//! ERR_VERSION_MISMATCH\r\n
//! ERR_REDIRECT <host> <port>\r\n
//! ERR_CMD_ERR\r\n
//! ```
//!
//! A `noreply` modifier on `set` suppresses the response entirely.
//!
//! The decoder tolerates arbitrary fragmentation: headers and payloads may
//! arrive split across any number of reads, including mid-token.

mod command;
mod response;
mod codec;

pub use command::Command;
pub use response::Response;
pub use codec::{Decoder, MAX_PAYLOAD_SIZE};
