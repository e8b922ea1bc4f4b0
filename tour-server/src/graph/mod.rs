//! Weighted graph over places.
//!
//! Every pair of indexed places is connected; edge weights are the
//! great-circle distance and the travel time and cost derived from it.
//! The graph is built once from a snapshot of the index and never updated.

mod config;
mod error;
mod route_graph;

pub use config::GraphConfig;
pub use error::GraphError;
pub use route_graph::{Edge, EdgeWeight, RouteGraph};
