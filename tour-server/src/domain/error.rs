//! Domain error types.
//!
//! These errors represent validation failures when constructing places.
//! They are distinct from index, graph and IO errors.

use super::EntityId;

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Price is negative or not a number
    #[error("invalid price {0}: must be a finite, non-negative amount")]
    InvalidPrice(f64),

    /// Rating outside the 0-5 scale
    #[error("invalid rating {0}: must be between 0 and 5")]
    InvalidRating(f64),

    /// Latitude or longitude out of range
    #[error("invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },

    /// Visit duration is negative or not a number
    #[error("invalid visit duration {0}h")]
    InvalidVisitDuration(f64),

    /// Only attractions carry a visit duration
    #[error("place {0} is lodging and cannot have a visit duration")]
    UnexpectedVisitDuration(EntityId),

    /// Unrecognised category label
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),
}
