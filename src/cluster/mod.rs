//! Cluster Module
//!
//! Keyspace ownership across a static set of nodes.
//!
//! ## Responsibilities
//! - Parse and display node addresses
//! - Deterministically map every key to exactly one owning node
//! - Decide local-serve vs redirect for each command
//!
//! The node list is fixed at startup and identical on every node, so a
//! client following one redirect always lands on the true owner.

mod node;
mod router;

pub use node::NodeAddr;
pub use router::{Placement, Router};
