//! API routes for the passwatch server.

pub mod endpoints;
pub mod passes;
mod routes;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
