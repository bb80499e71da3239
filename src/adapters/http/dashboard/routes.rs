//! HTTP routes for the admin dashboard.

use axum::{routing::get, Router};

use super::handlers::{
    export_sessions, get_session, list_sessions, session_stats, DashboardHandlers,
};

/// Creates the dashboard router with all endpoints.
///
/// Fixed paths are registered before the `:id` capture so `stats` and
/// `export` are not parsed as record ids.
pub fn dashboard_routes(handlers: DashboardHandlers) -> Router {
    Router::new()
        .route("/", get(list_sessions))
        .route("/stats", get(session_stats))
        .route("/export", get(export_sessions))
        .route("/:id", get(get_session))
        .with_state(handlers)
}
