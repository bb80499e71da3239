//! HTTP adapters - the gateway callback and admin endpoints.

pub mod dashboard;
pub mod ussd;

pub use dashboard::{dashboard_routes, DashboardHandlers};
pub use ussd::{ussd_routes, UssdHandlers};
