//! Network Module
//!
//! TCP server and per-connection handling.
//!
//! ## Architecture
//! - Single acceptor thread (nonblocking, polls a shutdown flag)
//! - One worker thread per client connection
//! - Each worker: read → decode → route → dispatch → respond

mod server;
mod connection;

pub use server::Server;
pub use connection::Connection;
