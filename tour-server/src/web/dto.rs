//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Comment, DomainError, Entity, EntityId};
use crate::index::OrderedIndex;
use crate::planner::{Route, RouteRequest, SearchResult};

/// A place in listings.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PlaceSummary {
    pub id: EntityId,
    pub name: String,
    pub category: Category,
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
    pub rating: f64,

    /// Estimated visit duration in hours (attractions only)
    pub visit_hours: Option<f64>,
}

impl PlaceSummary {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            name: entity.name().to_string(),
            category: entity.category(),
            latitude: entity.location().lat(),
            longitude: entity.location().lon(),
            price: entity.price(),
            rating: entity.rating(),
            visit_hours: entity.visit_hours(),
        }
    }
}

/// Response listing every place in key order.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceListResponse {
    pub count: usize,
    pub places: Vec<PlaceSummary>,
}

/// A single place with its comments.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: PlaceSummary,
    pub comments: Vec<CommentDto>,
}

impl PlaceDetail {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            place: PlaceSummary::from_entity(entity),
            comments: entity.comments().iter().map(CommentDto::from).collect(),
        }
    }
}

/// A visitor comment.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CommentDto {
    pub user: String,
    pub rating: f64,
    pub text: String,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            user: comment.user.clone(),
            rating: comment.rating,
            text: comment.text.clone(),
        }
    }
}

impl CommentDto {
    pub fn into_comment(self) -> Result<Comment, DomainError> {
        Comment::new(self.user, self.rating, self.text)
    }
}

/// Request to register a new place.
#[derive(Debug, Deserialize)]
pub struct CreatePlaceRequest {
    pub id: u64,
    pub name: String,

    /// "Lodging" or "Attraction" (Spanish labels also accepted)
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
    pub rating: f64,
    pub visit_hours: Option<f64>,
}

impl CreatePlaceRequest {
    pub fn into_entity(self) -> Result<Entity, DomainError> {
        Entity::new(
            EntityId(self.id),
            self.name,
            Category::parse(&self.category)?,
            self.latitude,
            self.longitude,
            self.price,
            self.rating,
            self.visit_hours,
        )
    }
}

/// Request to plan routes from an origin.
#[derive(Debug, Deserialize)]
pub struct PlanRoutesRequest {
    pub origin: u64,
    pub money_budget: f64,

    /// Time budget in hours
    pub time_budget: f64,

    /// Overrides the server's default result cap
    pub max_routes: Option<usize>,
}

impl PlanRoutesRequest {
    pub fn to_route_request(&self) -> RouteRequest {
        let request = RouteRequest::new(EntityId(self.origin), self.money_budget, self.time_budget);
        match self.max_routes {
            Some(n) => request.with_max_routes(n),
            None => request,
        }
    }
}

/// Query string for the map page. Routes are drawn only when all three
/// planning parameters are present.
#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    pub origin: Option<u64>,
    pub money_budget: Option<f64>,
    pub time_budget: Option<f64>,
}

impl MapQuery {
    pub fn to_route_request(&self) -> Option<RouteRequest> {
        Some(RouteRequest::new(
            EntityId(self.origin?),
            self.money_budget?,
            self.time_budget?,
        ))
    }
}

/// A stop on a planned route.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: EntityId,
    pub name: String,
    pub category: Category,
}

/// A planned route.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResult {
    pub stops: Vec<RouteStop>,
    pub score: f64,
    pub hours: f64,
    pub cost: f64,
    pub distance_km: f64,
}

impl RouteResult {
    /// Convert a route, naming each stop from the index.
    pub fn from_route(route: &Route, index: &OrderedIndex) -> Self {
        let stops = route
            .stops
            .iter()
            .filter_map(|&id| index.get(id))
            .map(|entity| RouteStop {
                id: entity.id(),
                name: entity.name().to_string(),
                category: entity.category(),
            })
            .collect();

        Self {
            stops,
            score: route.score,
            hours: route.hours,
            cost: route.cost,
            distance_km: route.distance_km,
        }
    }
}

/// Response from route planning.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanRoutesResponse {
    pub routes: Vec<RouteResult>,
    pub routes_explored: usize,
}

impl PlanRoutesResponse {
    pub fn from_result(result: &SearchResult, index: &OrderedIndex) -> Self {
        Self {
            routes: result
                .routes
                .iter()
                .map(|route| RouteResult::from_route(route, index))
                .collect(),
            routes_explored: result.routes_explored,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
