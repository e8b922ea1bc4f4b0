//! Domain types for the tour planner.
//!
//! This module contains the place records that the index stores and the
//! planner routes between. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod coords;
mod entity;
mod error;

pub use coords::{Coordinates, EARTH_RADIUS_KM};
pub use entity::{Category, Comment, Entity, EntityId, MAX_RATING};
pub use error::DomainError;
