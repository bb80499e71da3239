//! Menu module - the turn-based state machine.
//!
//! Splits each turn into pure pieces: input isolation, handler dispatch,
//! and rendering. Collaborator calls surface as [`EffectRequest`] values
//! executed at the application boundary.

mod engine;
mod handlers;
mod input;
mod render;
mod reply;

pub use engine::{step, EffectRequest, StepOutcome};
pub use input::{clean_text, latest_input, parse_amount, parse_iso_date, BACK_SENTINEL};
pub use render::{attendance_key, goal_type_key, render};
pub use reply::TurnReply;
