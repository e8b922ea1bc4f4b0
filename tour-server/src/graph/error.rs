//! Route graph error types.

use crate::domain::EntityId;

/// Errors from manual graph construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Edges must join two distinct places
    #[error("self-loop on place {0} is not allowed")]
    SelfLoop(EntityId),

    /// The pair is already connected
    #[error("places {0} and {1} are already connected")]
    DuplicateEdge(EntityId, EntityId),

    /// A weight component is negative or not a number
    #[error("invalid edge weight between {0} and {1}")]
    InvalidWeight(EntityId, EntityId),

    /// Travel speed must be positive and cost per km non-negative
    #[error("invalid travel model: {speed_kmh} km/h at {cost_per_km} per km")]
    InvalidConfig { speed_kmh: f64, cost_per_km: f64 },
}
