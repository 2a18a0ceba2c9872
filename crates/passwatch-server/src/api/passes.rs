//! Pass summary handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::api::routes::unknown_endpoint_error;
use crate::state::AppState;
use passwatch_core::catalog;
use passwatch_core::models::PassSummary;

#[derive(Debug, Deserialize)]
pub struct PassesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Restrict results to passes on one highway label (e.g. "I-90").
    pub highway: Option<String>,
}

/// Minimal pass data used to preview which passes a route crosses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassWaypoint {
    pub id: String,
    pub name: String,
    pub state: String,
    pub longitude: f64,
    pub highway: String,
}

/// Returns pass summaries. With `from` and `to` endpoint ids the result is
/// filtered to the passes whose longitude falls between the two locations,
/// ordered in trip direction; omit both to get all known passes.
pub async fn list_passes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PassesQuery>,
) -> Result<Json<Vec<PassSummary>>, (StatusCode, Json<serde_json::Value>)> {
    let mut pass_ids: Vec<String> = match (&query.from, &query.to) {
        (Some(from), Some(to)) => {
            let from_ep =
                catalog::endpoint_by_id(from).ok_or_else(|| unknown_endpoint_error(from))?;
            let to_ep = catalog::endpoint_by_id(to).ok_or_else(|| unknown_endpoint_error(to))?;

            let min_lon = from_ep.longitude.min(to_ep.longitude);
            let max_lon = from_ep.longitude.max(to_ep.longitude);
            let eastward = to_ep.longitude > from_ep.longitude;

            let mut window: Vec<_> = catalog::passes()
                .iter()
                .filter(|p| p.longitude > min_lon && p.longitude < max_lon)
                .collect();
            window.sort_by(|a, b| {
                if eastward {
                    a.longitude.total_cmp(&b.longitude)
                } else {
                    b.longitude.total_cmp(&a.longitude)
                }
            });
            window.into_iter().map(|p| p.id.clone()).collect()
        }
        _ => catalog::passes().iter().map(|p| p.id.clone()).collect(),
    };

    if let Some(highway) = &query.highway {
        pass_ids.retain(|id| {
            catalog::pass_by_id(id)
                .map(|p| p.highway.eq_ignore_ascii_case(highway))
                .unwrap_or(false)
        });
    }

    let summaries = state.aggregator().pass_summaries(&pass_ids).await;
    Ok(Json(summaries))
}

/// Returns minimal waypoint data for all known passes.
pub async fn list_pass_waypoints() -> Json<Vec<PassWaypoint>> {
    let waypoints = catalog::passes()
        .iter()
        .map(|p| PassWaypoint {
            id: p.id.clone(),
            name: p.name.clone(),
            state: p.state.clone(),
            longitude: p.longitude,
            highway: p.highway.clone(),
        })
        .collect();
    Json(waypoints)
}

/// Returns the summary for a single pass by id.
pub async fn get_pass(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PassSummary>, (StatusCode, Json<serde_json::Value>)> {
    match state.aggregator().pass_summary(&id).await {
        Some(summary) => Ok(Json(summary)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Pass '{}' not found", id) })),
        )),
    }
}
