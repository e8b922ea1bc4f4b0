//! Route planner using budget-constrained DFS.
//!
//! This module answers: "starting here, with this much money and time,
//! which sequences of places are worth visiting?"
//!
//! The search enumerates simple paths over the route graph, pruning any
//! extension that would break a budget, and ranks the routes it finds by
//! the total rating of the attractions they visit.

mod config;
mod rank;
mod route;
mod search;

pub use config::SearchConfig;
pub use rank::{deduplicate, rank_routes};
pub use route::{Budget, Route, Totals, evaluate_path};
pub use search::{EntityLookup, Planner, RouteRequest, SearchError, SearchResult};
