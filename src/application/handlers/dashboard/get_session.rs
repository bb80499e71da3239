//! GetSessionHandler - query handler for one session's detail.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, SessionRecordId};
use crate::ports::{SessionDetail, SessionReader};

/// Handler for fetching one session row.
pub struct GetSessionHandler {
    reader: Arc<dyn SessionReader>,
}

impl GetSessionHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if no row has this id
    pub async fn handle(&self, id: SessionRecordId) -> Result<SessionDetail, DomainError> {
        self.reader.find_by_id(&id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", id),
            )
        })
    }
}
