//! HTTP DTOs for the admin dashboard endpoints.
//!
//! These types decouple the HTTP API from port types, allowing independent
//! evolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::{
    BreakdownRow, SessionDetail, SessionPage, SessionStats, SessionSummary,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for listing and exporting sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionListParams {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Error body for failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

/// Session summary for list responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryResponse {
    pub id: String,
    pub session_id: String,
    pub phone_number: String,
    pub menu_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub language: String,
    pub step_count: u32,
    pub is_active: bool,
    pub created_at: String,
    pub last_interaction_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<SessionSummary> for SessionSummaryResponse {
    fn from(summary: SessionSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            session_id: summary.session_id,
            phone_number: summary.phone_number,
            menu_state: summary.menu_state.as_str().to_string(),
            role: summary.role.map(|r| r.as_str().to_string()),
            language: summary.language.code().to_string(),
            step_count: summary.step_count,
            is_active: summary.is_active,
            created_at: summary.created_at.as_datetime().to_rfc3339(),
            last_interaction_at: summary.last_interaction_at.as_datetime().to_rfc3339(),
            completed_at: summary.completed_at.map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// Full session detail.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub summary: SessionSummaryResponse,
    pub expires_at: String,
    pub input_history: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_code: Option<String>,
    pub error_count: u32,
}

impl From<SessionDetail> for SessionDetailResponse {
    fn from(detail: SessionDetail) -> Self {
        Self {
            summary: detail.summary.into(),
            expires_at: detail.expires_at.as_datetime().to_rfc3339(),
            input_history: detail.input_history,
            network_code: detail.network_code,
            error_count: detail.error_count,
        }
    }
}

/// Paginated list of sessions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub items: Vec<SessionSummaryResponse>,
    pub total: u64,
    pub has_more: bool,
}

impl From<SessionPage> for SessionListResponse {
    fn from(page: SessionPage) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            has_more: page.has_more,
        }
    }
}

/// One breakdown entry in the stats response.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownEntry {
    pub key: String,
    pub count: u64,
}

impl From<BreakdownRow> for BreakdownEntry {
    fn from(row: BreakdownRow) -> Self {
        Self { key: row.key, count: row.count }
    }
}

/// Aggregate session counters.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatsResponse {
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub completed_sessions: u64,
    pub started_today: u64,
    pub started_this_week: u64,
    pub by_role: Vec<BreakdownEntry>,
    pub by_language: Vec<BreakdownEntry>,
    pub average_steps: f64,
    pub completion_rate: f64,
}

impl From<SessionStats> for SessionStatsResponse {
    fn from(stats: SessionStats) -> Self {
        Self {
            total_sessions: stats.total_sessions,
            active_sessions: stats.active_sessions,
            completed_sessions: stats.completed_sessions,
            started_today: stats.started_today,
            started_this_week: stats.started_this_week,
            by_role: stats.by_role.into_iter().map(Into::into).collect(),
            by_language: stats.by_language.into_iter().map(Into::into).collect(),
            average_steps: stats.average_steps,
            completion_rate: stats.completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Language, SessionRecordId, Timestamp, UserRole};
    use crate::domain::session::MenuState;

    #[test]
    fn summary_response_uses_persistence_names() {
        let summary = SessionSummary {
            id: SessionRecordId::new(),
            session_id: "ATUid_1".to_string(),
            phone_number: "254712345678".to_string(),
            menu_state: MenuState::TrackingIncome,
            role: Some(UserRole::Beneficiary),
            language: Language::Swahili,
            step_count: 3,
            is_active: true,
            created_at: Timestamp::from_unix_secs(1_700_000_000),
            last_interaction_at: Timestamp::from_unix_secs(1_700_000_060),
            completed_at: None,
        };

        let response: SessionSummaryResponse = summary.into();
        assert_eq!(response.menu_state, "tracking_income");
        assert_eq!(response.role.as_deref(), Some("beneficiary"));
        assert_eq!(response.language, "sw");

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("completed_at"));
    }
}
