//! Dashboard query handlers - read-only consumers of the session log.

mod export_sessions;
mod get_session;
mod list_sessions;
mod session_stats;

pub use export_sessions::ExportSessionsHandler;
pub use get_session::GetSessionHandler;
pub use list_sessions::{ListSessionsHandler, ListSessionsQuery};
pub use session_stats::SessionStatsHandler;
