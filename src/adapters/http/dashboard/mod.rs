//! Dashboard HTTP adapter - read-only admin endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    SessionDetailResponse, SessionListParams, SessionListResponse, SessionStatsResponse,
    SessionSummaryResponse,
};
pub use handlers::DashboardHandlers;
pub use routes::dashboard_routes;
