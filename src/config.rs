//! Configuration for MeshKV
//!
//! Centralized configuration with sensible defaults.

use crate::cluster::NodeAddr;
use crate::error::{MeshError, Result};

/// Main configuration for a MeshKV node
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Cluster Configuration
    // -------------------------------------------------------------------------
    /// Address this node listens on and announces to the cluster
    pub listen_addr: NodeAddr,

    /// All cluster nodes, including this one. Read-only after startup;
    /// must be identical on every node for routing to agree.
    pub nodes: Vec<NodeAddr>,

    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Number of independently-locked shards in the entry store
    pub shard_count: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let listen = NodeAddr::new("127.0.0.1", 9000);
        Self {
            nodes: vec![listen.clone()],
            listen_addr: listen,
            shard_count: 16,
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check internal consistency
    ///
    /// The node list must be non-empty and contain the listen address,
    /// otherwise every routing decision would redirect away from this node.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(MeshError::Config("node list is empty".to_string()));
        }
        if !self.nodes.contains(&self.listen_addr) {
            return Err(MeshError::Config(format!(
                "listen address {} is not in the node list",
                self.listen_addr
            )));
        }
        if self.shard_count == 0 {
            return Err(MeshError::Config("shard count must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the listen address (also this node's cluster identity)
    pub fn listen_addr(mut self, addr: NodeAddr) -> Self {
        self.config.listen_addr = addr;
        self
    }

    /// Set the full cluster node list
    pub fn nodes(mut self, nodes: Vec<NodeAddr>) -> Self {
        self.config.nodes = nodes;
        self
    }

    /// Set the number of store shards
    pub fn shard_count(mut self, count: usize) -> Self {
        self.config.shard_count = count;
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
