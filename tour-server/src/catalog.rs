//! The place catalogue: the ordered index plus a cached route graph.
//!
//! The route graph is derived from a full traversal of the index. It is
//! built on first use and thrown away whenever the index changes, so the
//! next search sees every place. A graph handed out earlier stays valid:
//! the index only grows, so every vertex of an old graph is still present.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Comment, Entity, EntityId};
use crate::graph::{GraphConfig, GraphError, RouteGraph};
use crate::index::{IndexError, OrderedIndex};

/// Places and the graph derived from them.
#[derive(Debug, Clone)]
pub struct Catalog {
    index: OrderedIndex,
    graph_config: GraphConfig,
    graph: Option<Arc<RouteGraph>>,
}

impl Catalog {
    /// Create an empty catalogue.
    pub fn new(min_degree: usize, graph_config: GraphConfig) -> Result<Self, IndexError> {
        Ok(Self::from_index(OrderedIndex::new(min_degree)?, graph_config))
    }

    /// Wrap an already populated index.
    pub fn from_index(index: OrderedIndex, graph_config: GraphConfig) -> Self {
        Self {
            index,
            graph_config,
            graph: None,
        }
    }

    pub fn index(&self) -> &OrderedIndex {
        &self.index
    }

    pub fn graph_config(&self) -> &GraphConfig {
        &self.graph_config
    }

    /// Insert a place, invalidating the cached graph on success.
    pub fn insert(&mut self, entity: Entity) -> Result<(), IndexError> {
        self.index.insert(entity)?;
        self.graph = None;
        Ok(())
    }

    /// Append a comment to a place. Returns false if the place is unknown.
    pub fn annotate(&mut self, id: EntityId, comment: Comment) -> bool {
        self.index.annotate(id, comment)
    }

    /// The route graph over all current places, built if needed.
    pub fn route_graph(&mut self) -> Result<Arc<RouteGraph>, GraphError> {
        if let Some(graph) = &self.graph {
            return Ok(Arc::clone(graph));
        }

        let graph = Arc::new(RouteGraph::complete(&self.index, &self.graph_config)?);
        info!(
            places = graph.vertex_count(),
            edges = graph.edge_count(),
            "route graph rebuilt"
        );
        self.graph = Some(Arc::clone(&graph));
        Ok(graph)
    }

    /// The cached graph, if one is current.
    pub fn cached_graph(&self) -> Option<Arc<RouteGraph>> {
        self.graph.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sample_index;

    fn catalog() -> Catalog {
        Catalog::from_index(sample_index(), GraphConfig::default())
    }

    #[test]
    fn rejects_bad_degree() {
        assert!(Catalog::new(1, GraphConfig::default()).is_err());
    }

    #[test]
    fn graph_is_cached_until_insert() {
        let mut catalog = catalog();
        assert!(catalog.cached_graph().is_none());

        let first = catalog.route_graph().unwrap();
        let second = catalog.route_graph().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.vertex_count(), 8);

        let extra = Entity::lodging(40, "Posada", 14.05, -90.45, 30.0, 3.9).unwrap();
        catalog.insert(extra).unwrap();
        assert!(catalog.cached_graph().is_none());
        assert_eq!(catalog.route_graph().unwrap().vertex_count(), 9);
    }

    #[test]
    fn duplicate_insert_keeps_graph() {
        let mut catalog = catalog();
        let graph = catalog.route_graph().unwrap();

        let dup = Entity::lodging(10, "Hotel Sol", 14.1, -90.5, 100.0, 4.5).unwrap();
        assert_eq!(
            catalog.insert(dup),
            Err(IndexError::DuplicateKey(EntityId(10)))
        );
        assert!(Arc::ptr_eq(&graph, &catalog.cached_graph().unwrap()));
    }

    #[test]
    fn invalid_travel_model_is_reported() {
        let mut catalog = Catalog::from_index(sample_index(), GraphConfig::new(0.0, 0.5));
        assert!(matches!(
            catalog.route_graph(),
            Err(GraphError::InvalidConfig { .. })
        ));
        assert!(catalog.cached_graph().is_none());
    }

    #[test]
    fn stale_graph_still_resolves_in_grown_index() {
        let mut catalog = catalog();
        let old = catalog.route_graph().unwrap();

        let extra = Entity::lodging(40, "Posada", 14.05, -90.45, 30.0, 3.9).unwrap();
        catalog.insert(extra).unwrap();

        for id in old.vertices() {
            assert!(catalog.index().contains(id));
        }
        assert!(!old.contains(EntityId(40)));
    }
}
