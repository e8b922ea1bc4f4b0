//! Undirected weighted graph over place ids.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Entity, EntityId};

use super::config::GraphConfig;
use super::error::GraphError;

/// Weight of an undirected edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeWeight {
    pub distance_km: f64,
    pub hours: f64,
    pub cost: f64,
}

impl EdgeWeight {
    pub fn new(distance_km: f64, hours: f64, cost: f64) -> Self {
        Self {
            distance_km,
            hours,
            cost,
        }
    }

    fn is_valid(&self) -> bool {
        [self.distance_km, self.hours, self.cost]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// An adjacency list entry: the neighbour and the weight to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: EntityId,
    pub weight: EdgeWeight,
}

/// Adjacency-list graph, symmetric by construction.
///
/// Each adjacency list keeps edges in insertion order, which is the order
/// the route search explores them in.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    adjacency: BTreeMap<EntityId, Vec<Edge>>,
}

impl RouteGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the complete graph over `entities`.
    ///
    /// Repeated ids are dropped (the first occurrence wins) and the
    /// remaining pairs are joined in ascending id order, so for n distinct
    /// places this yields n(n-1)/2 edges. Quadratic in both time and
    /// memory: intended for catalogues of a few hundred places.
    pub fn complete<'a>(
        entities: impl IntoIterator<Item = &'a Entity>,
        config: &GraphConfig,
    ) -> Result<Self, GraphError> {
        if !config.is_valid() {
            return Err(GraphError::InvalidConfig {
                speed_kmh: config.speed_kmh,
                cost_per_km: config.cost_per_km,
            });
        }

        let mut unique: BTreeMap<EntityId, &Entity> = BTreeMap::new();
        for entity in entities {
            unique.entry(entity.id()).or_insert(entity);
        }
        let entities: Vec<&Entity> = unique.into_values().collect();

        let mut graph = Self::new();
        for entity in &entities {
            graph.add_vertex(entity.id());
        }

        for (i, a) in entities.iter().enumerate() {
            for b in &entities[i + 1..] {
                let distance_km = a.location().distance_km(&b.location());
                let weight = EdgeWeight::new(
                    distance_km,
                    config.travel_hours(distance_km),
                    config.travel_cost(distance_km),
                );
                graph.add_edge(a.id(), b.id(), weight)?;
            }
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built complete route graph"
        );
        Ok(graph)
    }

    /// Register a vertex with no edges. Does nothing if already present.
    pub fn add_vertex(&mut self, id: EntityId) {
        self.adjacency.entry(id).or_default();
    }

    /// Join `a` and `b`, adding the edge to both adjacency lists.
    ///
    /// Missing endpoints are registered. Self-loops, invalid weights and a
    /// second edge between the same pair are rejected.
    pub fn add_edge(
        &mut self,
        a: EntityId,
        b: EntityId,
        weight: EdgeWeight,
    ) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        if !weight.is_valid() {
            return Err(GraphError::InvalidWeight(a, b));
        }
        if self.edge_between(a, b).is_some() {
            return Err(GraphError::DuplicateEdge(a, b));
        }
        self.adjacency
            .entry(a)
            .or_default()
            .push(Edge { to: b, weight });
        self.adjacency
            .entry(b)
            .or_default()
            .push(Edge { to: a, weight });
        Ok(())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Edges leaving `id`, in insertion order. Empty if `id` is unknown.
    pub fn neighbors(&self, id: EntityId) -> &[Edge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_between(&self, a: EntityId, b: EntityId) -> Option<&EdgeWeight> {
        self.neighbors(a)
            .iter()
            .find(|edge| edge.to == b)
            .map(|edge| &edge.weight)
    }

    /// Vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Each undirected edge once, as `(lower id, higher id, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (EntityId, EntityId, &EdgeWeight)> + '_ {
        self.adjacency.iter().flat_map(|(&from, edges)| {
            edges
                .iter()
                .filter(move |edge| from < edge.to)
                .map(move |edge| (from, edge.to, &edge.weight))
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Number of adjacency-list entries (twice the edge count).
    pub fn adjacency_entries(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{sample_index, sample_places};

    fn id(n: u64) -> EntityId {
        EntityId(n)
    }

    fn weight(d: f64) -> EdgeWeight {
        EdgeWeight::new(d, d / 10.0, d * 2.0)
    }

    #[test]
    fn add_vertex_is_idempotent() {
        let mut graph = RouteGraph::new();
        graph.add_vertex(id(1));
        graph.add_edge(id(1), id(2), weight(5.0)).unwrap();
        graph.add_vertex(id(1));
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.neighbors(id(1)).len(), 1);
    }

    #[test]
    fn add_edge_is_symmetric() {
        let mut graph = RouteGraph::new();
        graph.add_edge(id(1), id(2), weight(5.0)).unwrap();
        assert_eq!(graph.edge_between(id(1), id(2)), Some(&weight(5.0)));
        assert_eq!(graph.edge_between(id(2), id(1)), Some(&weight(5.0)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn rejects_self_loops_and_duplicates() {
        let mut graph = RouteGraph::new();
        assert_eq!(
            graph.add_edge(id(1), id(1), weight(1.0)),
            Err(GraphError::SelfLoop(id(1)))
        );
        graph.add_edge(id(1), id(2), weight(1.0)).unwrap();
        assert_eq!(
            graph.add_edge(id(2), id(1), weight(3.0)),
            Err(GraphError::DuplicateEdge(id(2), id(1)))
        );
        assert_eq!(graph.adjacency_entries(), 2);
    }

    #[test]
    fn rejects_invalid_weights() {
        let mut graph = RouteGraph::new();
        let negative = EdgeWeight::new(-1.0, 0.0, 0.0);
        assert!(graph.add_edge(id(1), id(2), negative).is_err());
        let nan = EdgeWeight::new(1.0, f64::NAN, 0.0);
        assert!(graph.add_edge(id(1), id(2), nan).is_err());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn unknown_vertex_has_no_neighbors() {
        let graph = RouteGraph::new();
        assert!(graph.neighbors(id(42)).is_empty());
        assert!(!graph.contains(id(42)));
    }

    #[test]
    fn complete_graph_over_sample() {
        let index = sample_index();
        let graph = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();

        assert_eq!(graph.vertex_count(), 8);
        assert_eq!(graph.edge_count(), 8 * 7 / 2);
        assert_eq!(graph.adjacency_entries(), 8 * 7);
        for v in graph.vertices() {
            assert_eq!(graph.neighbors(v).len(), 7);
            assert!(graph.neighbors(v).iter().all(|e| e.to != v));
        }
    }

    #[test]
    fn complete_graph_weights_follow_config() {
        let places = sample_places();
        let config = GraphConfig::new(50.0, 2.0);
        let graph = RouteGraph::complete(&places, &config).unwrap();

        let w = graph.edge_between(id(10), id(20)).unwrap();
        assert!((w.hours - w.distance_km / 50.0).abs() < 1e-12);
        assert!((w.cost - w.distance_km * 2.0).abs() < 1e-12);
    }

    #[test]
    fn adjacency_follows_traversal_order() {
        let index = sample_index();
        let graph = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();
        let from_five: Vec<u64> = graph.neighbors(id(5)).iter().map(|e| e.to.0).collect();
        assert_eq!(from_five, vec![6, 7, 10, 12, 17, 20, 30]);
        let from_twenty: Vec<u64> = graph.neighbors(id(20)).iter().map(|e| e.to.0).collect();
        assert_eq!(from_twenty, vec![5, 6, 7, 10, 12, 17, 30]);
    }

    #[test]
    fn edges_listed_once() {
        let index = sample_index();
        let graph = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges.len(), 28);
        assert!(edges.iter().all(|(a, b, _)| a < b));
    }

    #[test]
    fn complete_drops_repeated_ids() {
        let places = vec![
            Entity::lodging(1, "Hotel Sol", 14.1, -90.5, 100.0, 4.5).unwrap(),
            Entity::attraction(2, "Museo de Arte", 14.3, -90.7, 0.0, 4.8, 2.0).unwrap(),
            Entity::lodging(1, "Hotel Sol (moved)", 14.6, -91.0, 100.0, 4.5).unwrap(),
        ];
        let graph = RouteGraph::complete(&places, &GraphConfig::default()).unwrap();

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors(id(2)).len(), 1);

        // The first occurrence supplies the coordinates.
        let first = places[0].location().distance_km(&places[1].location());
        let w = graph.edge_between(id(1), id(2)).unwrap();
        assert_eq!(w.distance_km, first);
    }

    #[test]
    fn complete_rejects_invalid_travel_model() {
        let index = sample_index();
        for config in [GraphConfig::new(0.0, 0.5), GraphConfig::new(40.0, f64::NAN)] {
            assert!(matches!(
                RouteGraph::complete(&index, &config),
                Err(GraphError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn rebuilding_does_not_accumulate() {
        let index = sample_index();
        let first = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();
        let second = RouteGraph::complete(&index, &GraphConfig::default()).unwrap();
        assert_eq!(first.edge_count(), second.edge_count());
    }
}
