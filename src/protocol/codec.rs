//! Protocol codec
//!
//! Incremental decoding of the text protocol and response serialization.
//!
//! ## Decoding Model
//!
//! The decoder owns a per-connection buffer. Bytes arrive in arbitrary
//! fragments via [`Decoder::feed`]; [`Decoder::try_decode`] yields a
//! command only once the entire header line — and for `set`/`cas` the
//! declared payload plus trailing `\r\n` — has accumulated. A header
//! parsed ahead of its payload is retained as pending state, so partial
//! input is never consumed twice and never lost.

use bytes::BytesMut;

use crate::error::{MeshError, Result};
use super::Command;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Maximum header line size, terminator included
const MAX_LINE_SIZE: usize = 4096;

/// Scratch capacity for the connection buffer
const INITIAL_BUF_CAPACITY: usize = 4096;

/// A write command whose header has been parsed but whose payload has not
/// fully arrived yet
#[derive(Debug)]
enum PendingWrite {
    Set {
        key: String,
        ttl_secs: u64,
        bytes: usize,
        noreply: bool,
    },
    Cas {
        key: String,
        ttl_secs: u64,
        expected_version: u64,
        bytes: usize,
    },
}

impl PendingWrite {
    fn declared_bytes(&self) -> usize {
        match self {
            PendingWrite::Set { bytes, .. } | PendingWrite::Cas { bytes, .. } => *bytes,
        }
    }

    fn into_command(self, value: Vec<u8>) -> Command {
        match self {
            PendingWrite::Set {
                key,
                ttl_secs,
                noreply,
                ..
            } => Command::Set {
                key,
                ttl_secs,
                value,
                noreply,
            },
            PendingWrite::Cas {
                key,
                ttl_secs,
                expected_version,
                ..
            } => Command::Cas {
                key,
                ttl_secs,
                expected_version,
                value,
            },
        }
    }
}

/// Incremental command decoder, one per connection
#[derive(Debug, Default)]
pub struct Decoder {
    /// Accumulated, not-yet-consumed input
    buf: BytesMut,

    /// Write command awaiting its payload
    pending: Option<PendingWrite>,
}

impl Decoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUF_CAPACITY),
            pending: None,
        }
    }

    /// Append freshly-read bytes to the buffer
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of buffered, unconsumed bytes
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Try to decode the next complete command
    ///
    /// Returns `Ok(None)` when more input is needed. A protocol error
    /// leaves the buffer unsynchronizable; the caller should stop decoding
    /// on this connection.
    pub fn try_decode(&mut self) -> Result<Option<Command>> {
        loop {
            // Payload phase: a header is parsed, wait for its full payload
            if let Some(pending) = &self.pending {
                let needed = pending.declared_bytes() + 2;
                if self.buf.len() < needed {
                    return Ok(None);
                }

                let pending = self.pending.take().unwrap();
                let declared = pending.declared_bytes();
                let frame = self.buf.split_to(needed);

                if &frame[declared..] != b"\r\n" {
                    return Err(MeshError::Protocol(format!(
                        "payload of {} bytes not terminated by CRLF",
                        declared
                    )));
                }

                let value = frame[..declared].to_vec();
                return Ok(Some(pending.into_command(value)));
            }

            // Header phase: wait for a complete line
            let line_end = match find_crlf(&self.buf) {
                Some(pos) => pos,
                None => {
                    if self.buf.len() > MAX_LINE_SIZE {
                        return Err(MeshError::Protocol(format!(
                            "header exceeds {} bytes without terminator",
                            MAX_LINE_SIZE
                        )));
                    }
                    return Ok(None);
                }
            };

            let line = self.buf.split_to(line_end + 2);
            let header = std::str::from_utf8(&line[..line_end])
                .map_err(|_| MeshError::Protocol("header is not valid UTF-8".to_string()))?;

            match self.parse_header(header)? {
                // Write commands loop back to the payload phase
                None => continue,
                Some(command) => return Ok(Some(command)),
            }
        }
    }

    /// Parse one header line
    ///
    /// Returns `Some` for commands complete at the header, `None` after
    /// stashing a write command as pending payload state.
    fn parse_header(&mut self, header: &str) -> Result<Option<Command>> {
        let tokens: Vec<&str> = header.split_whitespace().collect();

        match tokens.as_slice() {
            ["get", key] => Ok(Some(Command::Get {
                key: (*key).to_string(),
            })),

            ["getm", key] => Ok(Some(Command::GetMeta {
                key: (*key).to_string(),
            })),

            ["delete", key] => Ok(Some(Command::Delete {
                key: (*key).to_string(),
            })),

            ["set", key, ttl, bytes] | ["set", key, ttl, bytes, "noreply"] => {
                let noreply = tokens.len() == 5;
                self.pending = Some(PendingWrite::Set {
                    key: (*key).to_string(),
                    ttl_secs: parse_field(ttl, "ttl")?,
                    bytes: parse_payload_len(bytes)?,
                    noreply,
                });
                Ok(None)
            }

            ["cas", key, ttl, version, bytes] => {
                self.pending = Some(PendingWrite::Cas {
                    key: (*key).to_string(),
                    ttl_secs: parse_field(ttl, "ttl")?,
                    expected_version: parse_field(version, "version")?,
                    bytes: parse_payload_len(bytes)?,
                });
                Ok(None)
            }

            [] => Err(MeshError::Protocol("empty command line".to_string())),

            [verb, ..] => Err(MeshError::Protocol(format!(
                "malformed command: {:?}",
                verb
            ))),
        }
    }
}

/// Parse a numeric header field
fn parse_field(token: &str, name: &str) -> Result<u64> {
    token
        .parse::<u64>()
        .map_err(|_| MeshError::Protocol(format!("invalid {} field: {:?}", name, token)))
}

/// Parse and bound the declared payload length
fn parse_payload_len(token: &str) -> Result<usize> {
    let bytes = token
        .parse::<usize>()
        .map_err(|_| MeshError::Protocol(format!("invalid bytes field: {:?}", token)))?;

    if bytes > MAX_PAYLOAD_SIZE {
        return Err(MeshError::Protocol(format!(
            "payload too large: {} bytes (max {})",
            bytes, MAX_PAYLOAD_SIZE
        )));
    }

    Ok(bytes)
}

/// Find the first `\r\n` in the buffer
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}
