//! REST API routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::{endpoints, passes};
use crate::state::AppState;
use passwatch_core::catalog;
use passwatch_core::models::{ComputedRoute, HighwayInfo};

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/endpoints", get(endpoints::list_endpoints))
        .route("/api/routes", get(list_highways))
        .route("/api/routes/compute", get(compute_routes))
        .route("/api/passes", get(passes::list_passes))
        .route("/api/passes/waypoints", get(passes::list_pass_waypoints))
        .route("/api/passes/:id", get(passes::get_pass))
}

/// Returns all known highway corridors (I-90, US-2, etc.).
async fn list_highways() -> Json<&'static [HighwayInfo]> {
    Json(catalog::highways())
}

#[derive(Debug, Deserialize)]
pub struct ComputeRoutesQuery {
    pub from: String,
    pub to: String,
}

/// Computes ranked driving route options between two endpoint ids. An
/// unreachable routing oracle yields an empty list, which the client
/// presents as "no route found".
async fn compute_routes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ComputeRoutesQuery>,
) -> Result<Json<Vec<ComputedRoute>>, (StatusCode, Json<serde_json::Value>)> {
    let origin = catalog::endpoint_by_id(&query.from)
        .ok_or_else(|| unknown_endpoint_error(&query.from))?;
    let destination =
        catalog::endpoint_by_id(&query.to).ok_or_else(|| unknown_endpoint_error(&query.to))?;

    let routes = state.orchestrator().routes_between(origin, destination).await;
    Ok(Json(routes))
}

pub(crate) fn unknown_endpoint_error(id: &str) -> (StatusCode, Json<serde_json::Value>) {
    let valid: Vec<&str> = catalog::endpoints().iter().map(|e| e.id.as_str()).collect();
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": format!("Unknown endpoint id '{}'", id),
            "validIds": valid,
        })),
    )
}
