//! HTTP handler for the gateway callback endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};

use crate::application::handlers::ussd::ProcessUssdTurnHandler;

use super::dto::UssdCallbackRequest;

#[derive(Clone)]
pub struct UssdHandlers {
    process_handler: Arc<ProcessUssdTurnHandler>,
}

impl UssdHandlers {
    pub fn new(process_handler: Arc<ProcessUssdTurnHandler>) -> Self {
        Self { process_handler }
    }
}

/// POST /ussd - One gateway turn in, one CON/END body out.
///
/// Always 200 toward the gateway; failures surface as END messages inside
/// the body, never as transport errors.
pub async fn handle_callback(
    State(handlers): State<UssdHandlers>,
    Form(req): Form<UssdCallbackRequest>,
) -> Response {
    let reply = handlers.process_handler.handle(req.into()).await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        reply.to_protocol_string(),
    )
        .into_response()
}
