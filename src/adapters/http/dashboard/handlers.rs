//! HTTP handlers for the admin dashboard endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::dashboard::{
    ExportSessionsHandler, GetSessionHandler, ListSessionsHandler, ListSessionsQuery,
    SessionStatsHandler,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, SessionRecordId, Timestamp, UserRole,
};
use crate::ports::SessionFilter;

use super::dto::{
    ErrorResponse, SessionDetailResponse, SessionListParams, SessionListResponse,
    SessionStatsResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DashboardHandlers {
    list_handler: Arc<ListSessionsHandler>,
    get_handler: Arc<GetSessionHandler>,
    stats_handler: Arc<SessionStatsHandler>,
    export_handler: Arc<ExportSessionsHandler>,
}

impl DashboardHandlers {
    pub fn new(
        list_handler: Arc<ListSessionsHandler>,
        get_handler: Arc<GetSessionHandler>,
        stats_handler: Arc<SessionStatsHandler>,
        export_handler: Arc<ExportSessionsHandler>,
    ) -> Self {
        Self {
            list_handler,
            get_handler,
            stats_handler,
            export_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/sessions - List sessions with filters.
pub async fn list_sessions(
    State(handlers): State<DashboardHandlers>,
    Query(params): Query<SessionListParams>,
) -> Response {
    let filter = match build_filter(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let query = ListSessionsQuery {
        filter,
        page: params.page,
        per_page: params.per_page,
    };

    match handlers.list_handler.handle(query).await {
        Ok(page) => {
            let response: SessionListResponse = page.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/admin/sessions/:id - One session's detail.
pub async fn get_session(
    State(handlers): State<DashboardHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<SessionRecordId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session record ID")),
            )
                .into_response()
        }
    };

    match handlers.get_handler.handle(id).await {
        Ok(detail) => {
            let response: SessionDetailResponse = detail.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/admin/sessions/stats - Aggregate counters.
pub async fn session_stats(State(handlers): State<DashboardHandlers>) -> Response {
    match handlers.stats_handler.handle().await {
        Ok(stats) => {
            let response: SessionStatsResponse = stats.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/admin/sessions/export - Session log as CSV.
pub async fn export_sessions(
    State(handlers): State<DashboardHandlers>,
    Query(params): Query<SessionListParams>,
) -> Response {
    let filter = match build_filter(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    match handlers.export_handler.handle(filter).await {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"ussd_sessions.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn build_filter(params: &SessionListParams) -> Result<SessionFilter, Response> {
    let role = match params.role.as_deref() {
        Some(raw) => Some(UserRole::parse(raw).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(format!("Unknown role: {}", raw))),
            )
                .into_response()
        })?),
        None => None,
    };

    Ok(SessionFilter {
        phone: params.phone.clone(),
        role,
        active: params.active,
        from: params.from.map(Timestamp::from_datetime),
        to: params.to.map(Timestamp::from_datetime),
    })
}

fn error_response(err: DomainError) -> Response {
    let status = match err.code {
        ErrorCode::SessionNotFound
        | ErrorCode::UserNotFound
        | ErrorCode::BeneficiaryNotFound
        | ErrorCode::ContactNotFound => StatusCode::NOT_FOUND,
        ErrorCode::ValidationFailed
        | ErrorCode::EmptyField
        | ErrorCode::OutOfRange
        | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "dashboard request failed");
    }
    (
        status,
        Json(ErrorResponse::new(err.code.to_string(), err.message)),
    )
        .into_response()
}
