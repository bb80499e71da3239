//! USSD HTTP adapter - the single gateway-facing endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::UssdCallbackRequest;
pub use handlers::UssdHandlers;
pub use routes::ussd_routes;
