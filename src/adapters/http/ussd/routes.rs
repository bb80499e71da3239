//! HTTP routes for the USSD callback.

use axum::{routing::post, Router};

use super::handlers::{handle_callback, UssdHandlers};

/// Creates the USSD router.
pub fn ussd_routes(handlers: UssdHandlers) -> Router {
    Router::new()
        .route("/", post(handle_callback))
        .with_state(handlers)
}
