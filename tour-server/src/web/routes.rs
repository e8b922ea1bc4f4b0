//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::domain::{DomainError, EntityId};
use crate::export::csv::export_places;
use crate::export::dot::to_dot;
use crate::export::map::map_template;
use crate::export::ExportError;
use crate::graph::{GraphError, RouteGraph};
use crate::index::IndexError;
use crate::planner::{Planner, RouteRequest, SearchError, SearchResult};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/places", get(list_places).post(create_place))
        .route("/places/:id", get(get_place))
        .route("/places/:id/comments", post(add_comment))
        .route("/routes/plan", post(plan_routes))
        .route("/map", get(map_page))
        .route("/index.dot", get(index_dot))
        .route("/places.csv", get(places_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, reporting failures as bad requests.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(body), "JSON parse error");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// All places in key order.
async fn list_places(State(state): State<AppState>) -> Json<PlaceListResponse> {
    let catalog = state.catalog.read().await;
    let places: Vec<PlaceSummary> = catalog
        .index()
        .iter()
        .map(PlaceSummary::from_entity)
        .collect();

    Json(PlaceListResponse {
        count: places.len(),
        places,
    })
}

/// One place, with comments.
async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PlaceDetail>, AppError> {
    let catalog = state.catalog.read().await;
    let entity = catalog
        .index()
        .get(EntityId(id))
        .ok_or_else(|| AppError::not_found(id))?;
    Ok(Json(PlaceDetail::from_entity(entity)))
}

/// Register a new place.
async fn create_place(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: CreatePlaceRequest = parse_json(&body)?;
    let entity = req.into_entity()?;
    let detail = PlaceDetail::from_entity(&entity);

    state.catalog.write().await.insert(entity)?;
    info!(id = %detail.place.id, name = %detail.place.name, "place registered");

    Ok((StatusCode::CREATED, Json(detail)).into_response())
}

/// Append a visitor comment to a place.
async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: CommentDto = parse_json(&body)?;
    let comment = req.into_comment()?;
    let dto = CommentDto::from(&comment);

    if !state.catalog.write().await.annotate(EntityId(id), comment) {
        return Err(AppError::not_found(id));
    }

    Ok((StatusCode::CREATED, Json(dto)).into_response())
}

/// The current route graph.
///
/// Exclusive access is taken only when the cached graph is stale.
async fn route_graph(state: &AppState) -> Result<Arc<RouteGraph>, AppError> {
    if let Some(graph) = state.catalog.read().await.cached_graph() {
        return Ok(graph);
    }
    Ok(state.catalog.write().await.route_graph()?)
}

/// Run a route search under a shared lock, so searches and listings
/// proceed side by side.
async fn search(state: &AppState, request: &RouteRequest) -> Result<SearchResult, AppError> {
    let graph = route_graph(state).await?;
    let catalog = state.catalog.read().await;
    Ok(Planner::new(&graph, catalog.index(), &state.config).search(request)?)
}

/// Plan routes within a money and time budget.
async fn plan_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanRoutesResponse>, AppError> {
    let req: PlanRoutesRequest = parse_json(&body)?;
    let result = search(&state, &req.to_route_request()).await?;

    let catalog = state.catalog.read().await;
    Ok(Json(PlanRoutesResponse::from_result(&result, catalog.index())))
}

/// Interactive map, optionally overlaid with planned routes.
async fn map_page(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Response, AppError> {
    let routes = match query.to_route_request() {
        Some(request) => search(&state, &request).await?.routes,
        None => Vec::new(),
    };
    let graph = route_graph(&state).await?;

    let catalog = state.catalog.read().await;
    let template = map_template(catalog.index(), Some(&graph), &routes)?;
    Ok(askama_axum::into_response(&template))
}

/// The index structure as a Graphviz digraph.
async fn index_dot(State(state): State<AppState>) -> Response {
    let dot = to_dot(state.catalog.read().await.index());
    ([(header::CONTENT_TYPE, "text/vnd.graphviz")], dot).into_response()
}

/// All places as CSV.
async fn places_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let catalog = state.catalog.read().await;
    let mut body = Vec::new();
    export_places(&mut body, catalog.index(), &state.csv)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"places.csv\""),
        ],
        body,
    )
        .into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl AppError {
    fn not_found(id: u64) -> Self {
        AppError::NotFound {
            message: format!("Place {id} not found"),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<IndexError> for AppError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::DuplicateKey(_) => AppError::Conflict {
                message: e.to_string(),
            },
            IndexError::InvalidMinDegree(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<GraphError> for AppError {
    fn from(e: GraphError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidRequest(msg) => AppError::BadRequest { message: msg },
            SearchError::UnknownEntity(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};
    use tower::ServiceExt;

    use crate::catalog::Catalog;
    use crate::export::csv::CsvOptions;
    use crate::graph::GraphConfig;
    use crate::index::sample_index;
    use crate::planner::SearchConfig;

    fn state() -> AppState {
        AppState::new(
            Catalog::from_index(sample_index(), GraphConfig::default()),
            SearchConfig::default(),
            CsvOptions::new(b';'),
        )
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    async fn get_req(state: &AppState, uri: &str) -> (StatusCode, Bytes) {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(state: &AppState, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(state, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = get_req(&state(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn list_in_key_order() {
        let (status, body) = get_req(&state(), "/places").await;
        assert_eq!(status, StatusCode::OK);

        let list: PlaceListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.count, 8);
        let ids: Vec<u64> = list.places.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![5, 6, 7, 10, 12, 17, 20, 30]);
    }

    #[tokio::test]
    async fn get_place_and_missing() {
        let state = state();
        let (status, body) = get_req(&state, "/places/20").await;
        assert_eq!(status, StatusCode::OK);
        let detail: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(detail["name"], "Museo de Arte");
        assert_eq!(detail["category"], "Attraction");
        assert_eq!(detail["comments"], json!([]));

        let (status, body) = get_req(&state, "/places/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.error, "Place 99 not found");
    }

    #[tokio::test]
    async fn create_place_statuses() {
        let state = state();
        let place = json!({
            "id": 40,
            "name": "Mirador",
            "category": "Turístico",
            "latitude": 14.05,
            "longitude": -90.45,
            "price": 3.0,
            "rating": 4.4,
            "visit_hours": 1.0
        });

        let (status, body) = post_json(&state, "/places", place.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["category"], "Attraction");
        assert_eq!(state.catalog.read().await.index().len(), 9);

        let (status, _) = post_json(&state, "/places", place).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let bad = json!({
            "id": 41,
            "name": "Nowhere",
            "category": "Lodging",
            "latitude": 123.0,
            "longitude": 0.0,
            "price": 1.0,
            "rating": 1.0
        });
        let (status, _) = post_json(&state, "/places", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(&state, "/places", json!({ "id": "x" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn comments_are_appended() {
        let state = state();
        let comment = json!({ "user": "ana", "rating": 5.0, "text": "¡Excelente!" });

        let (status, _) = post_json(&state, "/places/20/comments", comment.clone()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = get_req(&state, "/places/20").await;
        let detail: PlaceDetail = serde_json::from_slice(&body).unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].user, "ana");

        let (status, _) = post_json(&state, "/places/99/comments", comment).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let bad = json!({ "user": "x", "rating": 9.0, "text": "" });
        let (status, _) = post_json(&state, "/places/20/comments", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn plan_routes_ranked() {
        let state = state();
        let (status, body) = post_json(
            &state,
            "/routes/plan",
            json!({ "origin": 10, "money_budget": 60.0, "time_budget": 12.0, "max_routes": 3 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let response: PlanRoutesResponse = serde_json::from_value(body).unwrap();
        assert!(!response.routes.is_empty());
        assert!(response.routes.len() <= 3);
        for route in &response.routes {
            assert_eq!(route.stops[0].name, "Hotel Sol");
            assert!(route.cost <= 60.0 && route.hours <= 12.0);
        }
        for pair in response.routes.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn plan_unknown_origin_is_empty() {
        let (status, body) = post_json(
            &state(),
            "/routes/plan",
            json!({ "origin": 99, "money_budget": 100.0, "time_budget": 10.0 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["routes"], json!([]));
        assert_eq!(body["routes_explored"], 0);
    }

    #[tokio::test]
    async fn search_runs_alongside_readers() {
        let state = state();
        state.catalog.write().await.route_graph().unwrap();
        let _reader = state.catalog.read().await;

        let request = RouteRequest::new(EntityId(10), 60.0, 12.0);
        let mut pending = pin!(search(&state, &request));
        let mut cx = Context::from_waker(Waker::noop());
        match pending.as_mut().poll(&mut cx) {
            Poll::Ready(result) => assert!(!result.unwrap().routes.is_empty()),
            Poll::Pending => panic!("search waited for exclusive access to the catalogue"),
        }
    }

    #[tokio::test]
    async fn plan_builds_graph_on_first_use() {
        let state = state();
        assert!(state.catalog.read().await.cached_graph().is_none());

        let (status, _) = post_json(
            &state,
            "/routes/plan",
            json!({ "origin": 10, "money_budget": 60.0, "time_budget": 12.0 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.catalog.read().await.cached_graph().is_some());
    }

    #[tokio::test]
    async fn invalid_travel_model_is_server_error() {
        let state = AppState::new(
            Catalog::from_index(sample_index(), GraphConfig::new(0.0, 0.5)),
            SearchConfig::default(),
            CsvOptions::default(),
        );
        let (status, body) = post_json(
            &state,
            "/routes/plan",
            json!({ "origin": 10, "money_budget": 60.0, "time_budget": 12.0 }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("travel model"));
    }

    #[tokio::test]
    async fn map_page_renders() {
        let state = state();
        let (status, body) = get_req(&state, "/map?origin=10&money_budget=60&time_budget=12").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("leaflet"));
        assert!(html.contains("\"stops\":[10,"));

        let (status, _) = get_req(&state, "/map").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn dot_and_csv_downloads() {
        let state = state();
        let (status, body) = get_req(&state, "/index.dot").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(b"digraph OrderedIndex {"));

        let (status, body) = get_req(&state, "/places.csv").await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert!(csv.starts_with("ID;Name;Category;"));
        assert_eq!(csv.lines().count(), 9);
    }
}
