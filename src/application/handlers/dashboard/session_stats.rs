//! SessionStatsHandler - query handler for aggregate session counters.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{SessionReader, SessionStats};

/// Handler for computing session statistics.
pub struct SessionStatsHandler {
    reader: Arc<dyn SessionReader>,
}

impl SessionStatsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self) -> Result<SessionStats, DomainError> {
        self.reader.stats(Timestamp::now()).await
    }
}
