//! Budget-constrained DFS route search.
//!
//! Enumerates simple paths from an origin, extending a path only while both
//! the money and the time budget still hold. Every valid path of two or more
//! stops is a candidate route; the search stops once enough have been found.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::domain::{Entity, EntityId};
use crate::graph::RouteGraph;
use crate::index::OrderedIndex;

use super::config::SearchConfig;
use super::rank::{deduplicate, rank_routes};
use super::route::{Budget, Route, Totals};

/// Error from route search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// The graph references a place the lookup table does not know
    #[error("place {0} is in the route graph but not in the catalogue")]
    UnknownEntity(EntityId),
}

/// Request for route search.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// Where every route starts.
    pub origin: EntityId,

    /// Money and time ceilings.
    pub budget: Budget,

    /// Result cap; falls back to [`SearchConfig::max_routes`].
    pub max_routes: Option<usize>,
}

impl RouteRequest {
    /// Create a new search request.
    pub fn new(origin: EntityId, money_budget: f64, time_budget: f64) -> Self {
        Self {
            origin,
            budget: Budget::new(money_budget, time_budget),
            max_routes: None,
        }
    }

    /// Override the configured result cap.
    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = Some(max_routes);
        self
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.budget.money.is_nan() {
            return Err(SearchError::InvalidRequest(
                "money budget is not a number".to_string(),
            ));
        }
        if self.budget.hours.is_nan() {
            return Err(SearchError::InvalidRequest(
                "time budget is not a number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Found routes, ranked best-first.
    pub routes: Vec<Route>,

    /// Number of path extensions explored during search.
    pub routes_explored: usize,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            routes: Vec::new(),
            routes_explored: 0,
        }
    }
}

/// Trait for looking up places by id.
///
/// This abstraction lets the planner run against the live index or against
/// a plain map in tests.
pub trait EntityLookup {
    fn lookup(&self, id: EntityId) -> Option<&Entity>;
}

impl EntityLookup for OrderedIndex {
    fn lookup(&self, id: EntityId) -> Option<&Entity> {
        self.get(id)
    }
}

impl EntityLookup for HashMap<EntityId, Entity> {
    fn lookup(&self, id: EntityId) -> Option<&Entity> {
        self.get(&id)
    }
}

/// Mutable DFS state shared across the whole search.
struct DfsState {
    path: Vec<EntityId>,
    on_path: HashSet<EntityId>,
    found: Vec<Route>,
    explored: usize,
    cap: usize,
    max_explored: usize,
}

impl DfsState {
    fn done(&self) -> bool {
        self.found.len() >= self.cap || self.explored >= self.max_explored
    }
}

/// Route planner over a prebuilt graph.
pub struct Planner<'a, L: EntityLookup> {
    graph: &'a RouteGraph,
    lookup: &'a L,
    config: &'a SearchConfig,
}

impl<'a, L: EntityLookup> Planner<'a, L> {
    /// Create a new planner.
    pub fn new(graph: &'a RouteGraph, lookup: &'a L, config: &'a SearchConfig) -> Self {
        Self {
            graph,
            lookup,
            config,
        }
    }

    /// Search for routes starting at the requested origin.
    ///
    /// An unknown origin or an exhausted budget yields an empty result,
    /// not an error.
    pub fn search(&self, request: &RouteRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;

        let cap = request.max_routes.unwrap_or(self.config.max_routes);
        if cap == 0 || request.budget.is_exhausted() {
            debug!(origin = %request.origin, "nothing to search: zero cap or budget");
            return Ok(SearchResult::empty());
        }
        if !self.graph.contains(request.origin) {
            debug!(origin = %request.origin, "origin not in route graph");
            return Ok(SearchResult::empty());
        }

        let origin = self.entity(request.origin)?;
        let start = Totals::at(origin);
        if !request.budget.allows(&start) {
            debug!(origin = %request.origin, "origin alone exceeds budget");
            return Ok(SearchResult::empty());
        }

        let mut state = DfsState {
            path: vec![request.origin],
            on_path: HashSet::from([request.origin]),
            found: Vec::new(),
            explored: 0,
            cap,
            max_explored: self.config.max_explored,
        };
        self.explore(&mut state, &request.budget, start)?;

        if state.explored >= self.config.max_explored {
            debug!(explored = state.explored, "route search hit exploration ceiling");
        }

        let mut routes = rank_routes(deduplicate(state.found));
        routes.truncate(cap);

        debug!(
            origin = %request.origin,
            routes = routes.len(),
            explored = state.explored,
            "route search finished"
        );

        Ok(SearchResult {
            routes,
            routes_explored: state.explored,
        })
    }

    /// Extend the current path with each admissible neighbour in turn.
    fn explore(
        &self,
        state: &mut DfsState,
        budget: &Budget,
        totals: Totals,
    ) -> Result<(), SearchError> {
        let Some(&current) = state.path.last() else {
            return Ok(());
        };

        for edge in self.graph.neighbors(current) {
            if state.done() {
                return Ok(());
            }
            if state.on_path.contains(&edge.to) {
                continue;
            }

            let next = self.entity(edge.to)?;
            let extended = totals.extend(&edge.weight, next);
            if !budget.allows(&extended) {
                trace!(from = %current, to = %edge.to, "pruned: over budget");
                continue;
            }

            state.explored += 1;
            state.path.push(edge.to);
            state.on_path.insert(edge.to);
            state.found.push(Route::new(state.path.clone(), extended));

            self.explore(state, budget, extended)?;

            state.on_path.remove(&edge.to);
            state.path.pop();
        }

        Ok(())
    }

    fn entity(&self, id: EntityId) -> Result<&'a Entity, SearchError> {
        self.lookup.lookup(id).ok_or(SearchError::UnknownEntity(id))
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
