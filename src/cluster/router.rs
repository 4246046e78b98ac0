//! Key-to-owner routing

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{MeshError, Result};
use super::NodeAddr;

/// Where a command should execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// This node owns the key; serve it from the local store
    Local,

    /// Another node owns the key; redirect the client there
    Remote(NodeAddr),
}

/// Maps keys to their owning node
///
/// The node list is sorted at construction and immutable afterwards, so
/// every node in the cluster computes the same owner for the same key.
/// All nodes are assumed to run the same build (the hasher must agree).
#[derive(Debug, Clone)]
pub struct Router {
    nodes: Vec<NodeAddr>,
    local_index: usize,
}

impl Router {
    /// Build a router for `local` within the cluster `nodes`
    ///
    /// Fails if the node list is empty or does not contain `local`.
    pub fn new(mut nodes: Vec<NodeAddr>, local: &NodeAddr) -> Result<Self> {
        if nodes.is_empty() {
            return Err(MeshError::Config("node list is empty".to_string()));
        }

        nodes.sort();
        nodes.dedup();

        let local_index = nodes
            .iter()
            .position(|n| n == local)
            .ok_or_else(|| {
                MeshError::Config(format!("local node {} is not in the node list", local))
            })?;

        Ok(Self { nodes, local_index })
    }

    /// The node owning `key`
    pub fn owner_of(&self, key: &str) -> &NodeAddr {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.nodes.len();
        &self.nodes[index]
    }

    /// Decide whether `key` is served locally or redirected
    pub fn place(&self, key: &str) -> Placement {
        let owner = self.owner_of(key);
        if owner == &self.nodes[self.local_index] {
            Placement::Local
        } else {
            Placement::Remote(owner.clone())
        }
    }

    /// This node's own address
    pub fn local_addr(&self) -> &NodeAddr {
        &self.nodes[self.local_index]
    }

    /// All cluster nodes, sorted
    pub fn nodes(&self) -> &[NodeAddr] {
        &self.nodes
    }
}
