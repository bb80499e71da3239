//! Session reader port (admin read side).
//!
//! Read-only consumers of the session log: listing, detail, aggregate
//! counters, and delimited export. Imposes no invariants on the engine.

use crate::domain::foundation::{
    DomainError, Language, SessionRecordId, Timestamp, UserRole,
};
use crate::domain::session::MenuState;
use async_trait::async_trait;

/// Filters applied to session listings and exports.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    /// Returns the row offset of this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.per_page
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, per_page: 25 }
    }
}

/// One session row in a listing or export.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: SessionRecordId,
    pub session_id: String,
    pub phone_number: String,
    pub menu_state: MenuState,
    pub role: Option<UserRole>,
    pub language: Language,
    pub step_count: u32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub last_interaction_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// Full detail of one session row.
#[derive(Debug, Clone)]
pub struct SessionDetail {
    pub summary: SessionSummary,
    pub expires_at: Timestamp,
    pub input_history: Vec<String>,
    pub network_code: Option<String>,
    pub error_count: u32,
}

/// One page of session summaries.
#[derive(Debug, Clone)]
pub struct SessionPage {
    pub items: Vec<SessionSummary>,
    pub total: u64,
    pub has_more: bool,
}

/// A labelled counter in a stats breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub key: String,
    pub count: u64,
}

/// Aggregate counters over the session log.
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub completed_sessions: u64,
    pub started_today: u64,
    pub started_this_week: u64,
    pub by_role: Vec<BreakdownRow>,
    pub by_language: Vec<BreakdownRow>,
    pub average_steps: f64,
    pub completion_rate: f64,
}

/// Reader port over the session log.
#[async_trait]
pub trait SessionReader: Send + Sync {
    /// List sessions matching the filter, newest first.
    async fn list(&self, filter: &SessionFilter, page: Page)
        -> Result<SessionPage, DomainError>;

    /// Fetch one session's detail.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionRecordId)
        -> Result<Option<SessionDetail>, DomainError>;

    /// Compute aggregate counters; `now` anchors the today/this-week
    /// windows.
    async fn stats(&self, now: Timestamp) -> Result<SessionStats, DomainError>;

    /// Fetch every session matching the filter for export, newest first.
    async fn export(&self, filter: &SessionFilter)
        -> Result<Vec<SessionSummary>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn SessionReader) {}
    }

    #[test]
    fn page_offset_is_zero_based() {
        let page = Page { page: 1, per_page: 25 };
        assert_eq!(page.offset(), 0);

        let page = Page { page: 3, per_page: 10 };
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn page_offset_tolerates_page_zero() {
        let page = Page { page: 0, per_page: 10 };
        assert_eq!(page.offset(), 0);
    }
}
