//! Ordered index of places.
//!
//! A B-tree keyed by place id: the single source of truth for which
//! places exist. Supports insert with proactive splitting, point search and
//! lazy in-order traversal.

mod error;
mod iter;
mod tree;

pub use error::IndexError;
pub use iter::Iter;
pub use tree::{IndexStats, Location, Node, NodeId, OrderedIndex};

#[cfg(test)]
pub(crate) use tree::tests::{sample_index, sample_places};
