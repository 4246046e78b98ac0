//! TCP Server
//!
//! Accepts connections and spawns a worker thread per client.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cluster::Router;
use crate::config::Config;
use crate::error::Result;
use crate::network::Connection;
use crate::store::Store;

/// Poll interval for the shutdown flag while no client is connecting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for one MeshKV node
pub struct Server {
    config: Config,
    store: Arc<Store>,
    router: Arc<Router>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Create a server: validate config, build the router, bind the socket
    pub fn new(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;

        let router = Arc::new(Router::new(config.nodes.clone(), &config.listen_addr)?);
        let listener = TcpListener::bind(config.listen_addr.to_string())?;

        Ok(Self {
            config,
            store,
            router,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The actually-bound socket address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// This node's routing view
    pub fn router(&self) -> Arc<Router> {
        Arc::clone(&self.router)
    }

    /// A flag that stops the accept loop when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the accept loop (blocking)
    ///
    /// Each accepted stream gets its own worker thread running the
    /// connection handler. Returns after the shutdown flag is set.
    pub fn run(&self) -> Result<()> {
        // Nonblocking accept so the shutdown flag is observed promptly
        self.listener.set_nonblocking(true)?;

        tracing::info!(
            "Listening on {} ({} cluster nodes, {} shards)",
            self.config.listen_addr,
            self.router.nodes().len(),
            self.store.shard_count()
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                    continue;
                }
                Err(e) => {
                    tracing::error!("Accept failed: {}", e);
                    return Err(e.into());
                }
            };

            if self.active.load(Ordering::Relaxed) >= self.config.max_connections {
                tracing::warn!("Connection limit reached, refusing {}", peer);
                drop(stream);
                continue;
            }

            // Worker threads use plain blocking reads
            stream.set_nonblocking(false)?;

            self.spawn_worker(stream);
        }

        tracing::info!("Server on {} shutting down", self.config.listen_addr);
        Ok(())
    }

    /// Signal the accept loop to stop
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    fn spawn_worker(&self, stream: std::net::TcpStream) {
        let store = Arc::clone(&self.store);
        let router = Arc::clone(&self.router);
        let active = Arc::clone(&self.active);
        let read_timeout = self.config.read_timeout_ms;
        let write_timeout = self.config.write_timeout_ms;

        active.fetch_add(1, Ordering::Relaxed);

        thread::spawn(move || {
            let result = Connection::new(stream, store, router).and_then(|mut conn| {
                conn.set_timeouts(read_timeout, write_timeout)?;
                conn.handle()
            });

            if let Err(e) = result {
                tracing::debug!("Connection ended with error: {}", e);
            }

            active.fetch_sub(1, Ordering::Relaxed);
        });
    }
}
