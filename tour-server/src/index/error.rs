//! Ordered index error types.

use crate::domain::EntityId;

/// Errors from the ordered index.
///
/// A search miss is not an error; lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The minimum degree must be at least 2
    #[error("invalid minimum degree {0}: must be at least 2")]
    InvalidMinDegree(usize),

    /// An entity with this id is already indexed; nothing was changed
    #[error("place {0} is already registered")]
    DuplicateKey(EntityId),
}
