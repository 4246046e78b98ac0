//! Connection Handler
//!
//! Handles individual client connections.
//!
//! Per-connection state machine: read bytes into the decoder, drain all
//! complete commands in arrival order, route each one, dispatch local
//! commands to the store, write responses (unless suppressed by
//! `noreply`), then read again. Transport closure or an unrecoverable
//! protocol error ends the loop.

use std::io::{BufWriter, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::cluster::{Placement, Router};
use crate::error::{MeshError, Result};
use crate::protocol::{Command, Decoder, Response};
use crate::store::Store;

/// Read chunk size; the decoder buffers across chunks, so this bounds a
/// single read, not a command
const READ_CHUNK_SIZE: usize = 4096;

/// Handles a single client connection
pub struct Connection {
    /// Raw TCP read side; the decoder does its own buffering
    stream: TcpStream,

    /// TCP stream writer (buffered, flushed per batch of commands)
    writer: BufWriter<TcpStream>,

    /// Incremental command decoder holding partial input
    decoder: Decoder,

    /// Shared entry store
    store: Arc<Store>,

    /// Keyspace ownership
    router: Arc<Router>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered writes and disables Nagle's algorithm.
    pub fn new(stream: TcpStream, store: Arc<Store>, router: Arc<Router>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let write_stream = stream.try_clone()?;

        Ok(Self {
            stream,
            writer: BufWriter::new(write_stream),
            decoder: Decoder::new(),
            store,
            router,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Returns when the client disconnects, a protocol error closes the
    /// connection, or an I/O error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            let n = match self.stream.read(&mut chunk) {
                Ok(0) => {
                    // Client disconnected gracefully
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Ok(n) => n,
                Err(ref e) if e.kind() == std::io::ErrorKind::ConnectionReset => {
                    tracing::debug!("Connection reset by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::ConnectionAborted => {
                    tracing::debug!("Connection aborted by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    // Windows reports timeouts as TimedOut instead of WouldBlock
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e.into());
                }
            };

            self.decoder.feed(&chunk[..n]);

            // Drain every command completed by this read, in arrival order
            loop {
                match self.decoder.try_decode() {
                    Ok(Some(command)) => {
                        tracing::trace!(
                            "Received command from {}: {:?}",
                            self.peer_addr,
                            command
                        );
                        if let Some(response) = self.execute_command(command) {
                            self.send_response(&response)?;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        // The stream cannot be re-synchronized after a
                        // framing error; report and close.
                        tracing::warn!("Protocol error from {}: {}", self.peer_addr, e);
                        let _ = self.send_response(&Response::CmdError);
                        let _ = self.writer.flush();
                        return Err(e);
                    }
                }
            }

            if let Err(e) = self.flush() {
                if let MeshError::Io(ref io_err) = e {
                    match io_err.kind() {
                        std::io::ErrorKind::ConnectionAborted
                        | std::io::ErrorKind::ConnectionReset
                        | std::io::ErrorKind::BrokenPipe => {
                            tracing::debug!(
                                "Client {} disconnected before response could be sent: {}",
                                self.peer_addr,
                                e
                            );
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Execute a command and produce its response
    ///
    /// Returns `None` when the response is suppressed (`set ... noreply`).
    /// A key owned by another node is never dispatched to the store; the
    /// client gets a redirect naming the owner instead.
    fn execute_command(&self, command: Command) -> Option<Response> {
        let noreply = command.is_noreply();

        let response = match self.router.place(command.key()) {
            Placement::Remote(owner) => Response::Redirect {
                host: owner.host,
                port: owner.port,
            },
            Placement::Local => self.dispatch(command),
        };

        if noreply {
            None
        } else {
            Some(response)
        }
    }

    /// Apply a locally-owned command to the store
    fn dispatch(&self, command: Command) -> Response {
        match command {
            Command::Set {
                key,
                ttl_secs,
                value,
                ..
            } => {
                let version = self.store.set(&key, value, ttl_secs);
                Response::Ok { version }
            }

            Command::Cas {
                key,
                ttl_secs,
                expected_version,
                value,
            } => match self
                .store
                .compare_and_swap(&key, expected_version, value, ttl_secs)
            {
                Ok(version) => Response::Ok { version },
                Err(MeshError::VersionMismatch) => Response::VersionMismatch,
                Err(_) => Response::NotFound,
            },

            Command::Get { key } => match self.store.get(&key) {
                Ok((payload, _version)) => Response::Value { payload },
                Err(_) => Response::NotFound,
            },

            Command::GetMeta { key } => match self.store.get_meta(&key) {
                Ok(version) => Response::Version { version },
                Err(_) => Response::NotFound,
            },

            Command::Delete { key } => match self.store.delete(&key) {
                Ok(()) => Response::Deleted,
                Err(_) => Response::NotFound,
            },
        }
    }

    /// Queue a response on the buffered writer
    fn send_response(&mut self, response: &Response) -> Result<()> {
        self.writer.write_all(&response.to_bytes())?;
        Ok(())
    }

    /// Flush all queued responses to the client
    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
