//! HTTP route handlers for the JSON API.
//!
//! Handlers take one graph snapshot per request and delegate to it, so a
//! concurrent reload never changes the data a request is reading.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info};

use strand_core::graph::models::{IndexStats, Neighborhood, Neighbors, NodeDetails, SearchHit};
use strand_core::{QueryError, SearchQuery};

use super::models::{
    CreatorSummary, ErrorBody, NeighborhoodParams, NeighborsParams, SchemasResponse, SearchParams,
};
use super::AppState;

// =============================================================================
// Errors
// =============================================================================

/// Failure returned by a handler.
pub enum ApiError {
    /// The requested uid is not loaded. Rendered as a 404 carrying the
    /// structured not-found result.
    NotFound(QueryError),
    /// The dataset could not be reloaded; the previous graph is still served.
    ReloadFailed(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::NotFound(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(err) => {
                debug!(uid = err.uid(), "Node not found");
                (StatusCode::NOT_FOUND, Json(err)).into_response()
            }
            ApiError::ReloadFailed(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: "reload_failed".to_string(),
                    message,
                }),
            )
                .into_response(),
        }
    }
}

// =============================================================================
// Query Handlers
// =============================================================================

/// GET `/api/search?q=...&type=...&creator=...&limit=...`
pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchHit>> {
    let query = SearchQuery {
        text: params.q,
        node_type: params.node_type,
        creator: params.creator,
        limit: params.limit,
    };
    Json(state.graph.current().search(&query))
}

/// GET `/api/nodes/{uid}` - a node with its relations.
pub async fn api_node(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<NodeDetails>, ApiError> {
    Ok(Json(state.graph.current().node_details(&uid)?))
}

/// GET `/api/nodes/{uid}/neighbors?direction=...`
pub async fn api_neighbors(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Query(params): Query<NeighborsParams>,
) -> Result<Json<Neighbors>, ApiError> {
    Ok(Json(
        state.graph.current().direct_neighbors(&uid, params.direction)?,
    ))
}

/// GET `/api/nodes/{uid}/neighborhood?depth=...&direction=...&type=...&relation=...`
pub async fn api_neighborhood(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Query(params): Query<NeighborhoodParams>,
) -> Result<Json<Neighborhood>, ApiError> {
    let graph = state.graph.current();
    let mut query = graph.neighborhood_query(uid).with_direction(params.direction);
    if let Some(depth) = params.depth {
        query = query.with_depth(depth);
    }
    query.node_type = params.node_type;
    query.relation = params.relation;

    Ok(Json(graph.neighborhood(&query)?))
}

/// GET `/api/schemas`
pub async fn api_schemas(State(state): State<Arc<AppState>>) -> Json<SchemasResponse> {
    let graph = state.graph.current();
    Json(SchemasResponse {
        schemas: graph.schemas().into_iter().cloned().collect(),
        relation_defs: graph.relation_defs().into_iter().cloned().collect(),
    })
}

/// GET `/api/creators`
pub async fn api_creators(State(state): State<Arc<AppState>>) -> Json<Vec<CreatorSummary>> {
    let graph = state.graph.current();
    let creators = graph
        .creators()
        .iter()
        .map(|name| CreatorSummary {
            name: name.clone(),
            nodes: graph.nodes_by_creator(name).len(),
        })
        .collect();
    Json(creators)
}

/// GET `/api/stats`
pub async fn api_stats(State(state): State<Arc<AppState>>) -> Json<IndexStats> {
    Json(state.graph.current().stats().clone())
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// POST `/api/reload` - rebuild the graph from the dataset file.
pub async fn api_reload(State(state): State<Arc<AppState>>) -> Result<Json<IndexStats>, ApiError> {
    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || worker.graph.reload(&worker.source))
        .await
        .map_err(|e| ApiError::ReloadFailed(e.to_string()))?;

    match result {
        Ok(graph) => {
            info!(nodes = graph.stats().nodes, "Reload requested over HTTP");
            Ok(Json(graph.stats().clone()))
        }
        Err(e) => {
            error!(error = %e, "Reload failed");
            Err(ApiError::ReloadFailed(e.to_string()))
        }
    }
}
