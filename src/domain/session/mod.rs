//! Session module - the persistent conversational context.
//!
//! A session row is the only durable state of the menu engine; everything
//! the next turn needs is reconstructed from it.

mod aggregate;
mod flow;
mod identity;
mod menu_state;
mod metadata;

pub use aggregate::UssdSession;
pub use flow::{
    ActiveFlow, ContactBrowse, ContactDraft, FlowData, GoalBrowse, GoalDraft, TrackingDraft,
};
pub use identity::CallerIdentity;
pub use menu_state::{FlowFamily, MenuState};
pub use metadata::SessionMetadata;
