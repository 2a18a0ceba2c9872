//! Route endpoint handlers.

use axum::Json;
use passwatch_core::catalog;
use passwatch_core::models::RouteEndpoint;

/// Returns all known route endpoints (cities), ordered west to east.
pub async fn list_endpoints() -> Json<&'static [RouteEndpoint]> {
    Json(catalog::endpoints())
}
