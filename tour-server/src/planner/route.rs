//! Routes, budgets and route scoring.

use std::collections::HashSet;

use crate::domain::{Entity, EntityId};
use crate::graph::{EdgeWeight, RouteGraph};

use super::search::EntityLookup;

/// Resource ceilings a route must respect at every prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    /// Money available (same unit as prices and travel cost).
    pub money: f64,

    /// Time available, in hours.
    pub hours: f64,
}

impl Budget {
    pub fn new(money: f64, hours: f64) -> Self {
        Self { money, hours }
    }

    /// Whether `totals` fits within this budget.
    pub fn allows(&self, totals: &Totals) -> bool {
        totals.cost <= self.money && totals.hours <= self.hours
    }

    /// A budget that no route of two or more stops can satisfy.
    pub fn is_exhausted(&self) -> bool {
        self.money <= 0.0 || self.hours <= 0.0
    }
}

/// Running sums along a path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub score: f64,
    pub hours: f64,
    pub cost: f64,
    pub distance_km: f64,
}

impl Totals {
    /// Totals for a path consisting only of `origin`.
    pub fn at(origin: &Entity) -> Self {
        Self {
            score: origin.route_score(),
            hours: origin.route_hours(),
            cost: origin.route_cost(),
            distance_km: 0.0,
        }
    }

    /// Totals after travelling over `edge` and visiting `next`.
    pub fn extend(&self, edge: &EdgeWeight, next: &Entity) -> Self {
        Self {
            score: self.score + next.route_score(),
            hours: self.hours + edge.hours + next.route_hours(),
            cost: self.cost + edge.cost + next.route_cost(),
            distance_km: self.distance_km + edge.distance_km,
        }
    }
}

/// A simple path through the graph with its score and resource use.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub stops: Vec<EntityId>,
    pub score: f64,
    pub hours: f64,
    pub cost: f64,
    pub distance_km: f64,
}

impl Route {
    pub fn new(stops: Vec<EntityId>, totals: Totals) -> Self {
        Self {
            stops,
            score: totals.score,
            hours: totals.hours,
            cost: totals.cost,
            distance_km: totals.distance_km,
        }
    }

    pub fn origin(&self) -> Option<EntityId> {
        self.stops.first().copied()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Score an arbitrary path.
///
/// Returns `None` (an invalid route) when the path has fewer than two
/// stops, repeats a stop, uses a missing edge, names an unknown place, or
/// exceeds the budget at any prefix.
pub fn evaluate_path<L: EntityLookup + ?Sized>(
    path: &[EntityId],
    graph: &RouteGraph,
    lookup: &L,
    budget: &Budget,
) -> Option<Route> {
    let (&first, rest) = path.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut seen = HashSet::with_capacity(path.len());
    seen.insert(first);

    let mut totals = Totals::at(lookup.lookup(first)?);
    if !budget.allows(&totals) {
        return None;
    }

    let mut previous = first;
    for &stop in rest {
        if !seen.insert(stop) {
            return None;
        }
        let edge = graph.edge_between(previous, stop)?;
        totals = totals.extend(edge, lookup.lookup(stop)?);
        if !budget.allows(&totals) {
            return None;
        }
        previous = stop;
    }

    Some(Route::new(path.to_vec(), totals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphConfig;
    use crate::index::sample_index;

    fn ids(raw: &[u64]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId).collect()
    }

    #[test]
    fn budget_bounds_are_inclusive() {
        let budget = Budget::new(10.0, 2.0);
        let mut totals = Totals {
            cost: 10.0,
            hours: 2.0,
            ..Totals::default()
        };
        assert!(budget.allows(&totals));
        totals.cost = 10.01;
        assert!(!budget.allows(&totals));
    }

    #[test]
    fn exhausted_budgets() {
        assert!(Budget::new(0.0, 5.0).is_exhausted());
        assert!(Budget::new(5.0, -1.0).is_exhausted());
        assert!(!Budget::new(0.5, 0.5).is_exhausted());
    }

    #[test]
    fn evaluates_sample_route() {
        let index = sample_index();
        let graph = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();
        let budget = Budget::new(1_000.0, 100.0);

        // Hotel Sol -> Museo de Arte -> Parque Nacional
        let route = evaluate_path(&ids(&[10, 20, 6]), &graph, &index, &budget).unwrap();
        assert!((route.score - (4.8 + 4.7)).abs() < 1e-9);

        let leg1 = graph.edge_between(EntityId(10), EntityId(20)).unwrap();
        let leg2 = graph.edge_between(EntityId(20), EntityId(6)).unwrap();
        let expected_cost = leg1.cost + 0.0 + leg2.cost + 5.0;
        let expected_hours = leg1.hours + 2.0 + leg2.hours + 4.0;
        assert!((route.cost - expected_cost).abs() < 1e-9);
        assert!((route.hours - expected_hours).abs() < 1e-9);
        assert_eq!(route.origin(), Some(EntityId(10)));
    }

    #[test]
    fn invalid_paths() {
        let index = sample_index();
        let graph = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();
        let budget = Budget::new(1_000.0, 100.0);

        assert!(evaluate_path(&[], &graph, &index, &budget).is_none());
        assert!(evaluate_path(&ids(&[10]), &graph, &index, &budget).is_none());
        assert!(evaluate_path(&ids(&[10, 20, 10]), &graph, &index, &budget).is_none());
        assert!(evaluate_path(&ids(&[10, 99]), &graph, &index, &budget).is_none());
    }

    #[test]
    fn budget_violation_anywhere_invalidates() {
        let index = sample_index();
        let graph = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();

        // Ruinas Mayas alone costs 15 plus travel.
        let tight = Budget::new(15.0, 100.0);
        assert!(evaluate_path(&ids(&[10, 17]), &graph, &index, &tight).is_none());

        // Five hours at the ruins blow a four hour budget.
        let short = Budget::new(1_000.0, 4.0);
        assert!(evaluate_path(&ids(&[10, 17]), &graph, &index, &short).is_none());
        assert!(evaluate_path(&ids(&[10, 12]), &graph, &index, &short).is_some());
    }
}
