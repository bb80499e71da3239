//! USSD application handlers - the turn pipeline and session hygiene.

mod expire_sessions;
mod locks;
mod process_turn;

pub use expire_sessions::ExpireStaleSessionsHandler;
pub use locks::SessionLocks;
pub use process_turn::{ProcessUssdTurnHandler, UssdTurnRequest};
