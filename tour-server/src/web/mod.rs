//! Web layer for the tour planner.
//!
//! Provides HTTP endpoints for managing places, planning routes and
//! downloading the catalogue in its export formats.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
