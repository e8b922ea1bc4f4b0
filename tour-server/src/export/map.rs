//! Interactive HTML map of places, graph edges and planned routes.
//!
//! The page is an askama template that embeds its data as JSON and draws
//! it with Leaflet in the browser.

use std::path::Path;

use askama::Template;
use serde::Serialize;

use crate::domain::{Category, Entity, EntityId};
use crate::graph::RouteGraph;
use crate::index::OrderedIndex;
use crate::planner::Route;

use super::error::ExportError;

/// Full-page map.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub title: String,
    pub places_json: String,
    pub edges_json: String,
    pub routes_json: String,
}

// ============================================================================
// View Models (serialized into the page)
// ============================================================================

#[derive(Debug, Serialize)]
struct PlaceView<'a> {
    id: EntityId,
    name: &'a str,
    category: Category,
    lat: f64,
    lon: f64,
    price: f64,
    rating: f64,
    visit_hours: Option<f64>,
}

impl<'a> From<&'a Entity> for PlaceView<'a> {
    fn from(entity: &'a Entity) -> Self {
        Self {
            id: entity.id(),
            name: entity.name(),
            category: entity.category(),
            lat: entity.location().lat(),
            lon: entity.location().lon(),
            price: entity.price(),
            rating: entity.rating(),
            visit_hours: entity.visit_hours(),
        }
    }
}

/// A straight segment between two places, as `[[lat, lon], [lat, lon]]`.
type Segment = [[f64; 2]; 2];

#[derive(Debug, Serialize)]
struct RouteView {
    stops: Vec<EntityId>,
    score: f64,
    points: Vec<[f64; 2]>,
}

fn point(entity: &Entity) -> [f64; 2] {
    let location = entity.location();
    [location.lat(), location.lon()]
}

/// Serialize for embedding inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// Build the map page for the current places.
///
/// Edges are drawn only when a graph is given. Route stops missing from the
/// index are skipped.
pub fn map_template(
    index: &OrderedIndex,
    graph: Option<&RouteGraph>,
    routes: &[Route],
) -> Result<MapTemplate, ExportError> {
    let places: Vec<PlaceView<'_>> = index.iter().map(PlaceView::from).collect();

    let edges: Vec<Segment> = graph
        .map(|graph| {
            graph
                .edges()
                .filter_map(|(a, b, _)| Some([point(index.get(a)?), point(index.get(b)?)]))
                .collect()
        })
        .unwrap_or_default();

    let routes: Vec<RouteView> = routes
        .iter()
        .map(|route| RouteView {
            stops: route.stops.clone(),
            score: route.score,
            points: route
                .stops
                .iter()
                .filter_map(|&id| index.get(id).map(point))
                .collect(),
        })
        .collect();

    Ok(MapTemplate {
        title: format!("{} places", index.len()),
        places_json: script_json(&places)?,
        edges_json: script_json(&edges)?,
        routes_json: script_json(&routes)?,
    })
}

/// Render the map page to a string.
pub fn render_map(
    index: &OrderedIndex,
    graph: Option<&RouteGraph>,
    routes: &[Route],
) -> Result<String, ExportError> {
    Ok(map_template(index, graph, routes)?.render()?)
}

/// Render the map page and write it to `path`.
pub fn save_map(
    path: impl AsRef<Path>,
    index: &OrderedIndex,
    graph: Option<&RouteGraph>,
    routes: &[Route],
) -> Result<(), ExportError> {
    let html = render_map(index, graph, routes)?;
    std::fs::write(path, html)?;
    Ok(())
}
