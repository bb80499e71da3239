//! ExpireStaleSessionsHandler - periodic reporting-hygiene sweep.
//!
//! Conversational expiry is detected lazily on the next turn; this batch
//! sweep only flips long-silent active rows to inactive so dashboards and
//! exports do not overcount live sessions. It has no effect on
//! conversational correctness.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::SessionRepository;

/// Handler for sweeping stale active sessions.
pub struct ExpireStaleSessionsHandler {
    sessions: Arc<dyn SessionRepository>,
}

impl ExpireStaleSessionsHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// Deactivates active sessions whose stored deadline has passed.
    ///
    /// Returns the number of rows swept.
    pub async fn handle(&self, now: Timestamp) -> Result<u64, DomainError> {
        let swept = self.sessions.deactivate_stale(now).await?;
        if swept > 0 {
            tracing::info!(swept, "deactivated stale sessions");
        }
        Ok(swept)
    }
}
