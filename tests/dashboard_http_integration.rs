//! Integration tests for the admin dashboard HTTP endpoints.
//!
//! These tests verify the HTTP layer wiring over an in-memory session
//! reader: routing, query-parameter filtering, JSON shapes, and the CSV
//! export framing.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use tumaini_ussd::adapters::http::{dashboard_routes, DashboardHandlers};
use tumaini_ussd::application::handlers::dashboard::{
    ExportSessionsHandler, GetSessionHandler, ListSessionsHandler, SessionStatsHandler,
};
use tumaini_ussd::domain::foundation::{
    DomainError, Language, SessionRecordId, Timestamp, UserRole,
};
use tumaini_ussd::domain::session::MenuState;
use tumaini_ussd::ports::{
    BreakdownRow, Page, SessionDetail, SessionFilter, SessionPage, SessionReader, SessionStats,
    SessionSummary,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory reader computing listings and counters from a fixed row set.
struct InMemorySessionReader {
    rows: Vec<SessionSummary>,
}

impl InMemorySessionReader {
    fn matches(filter: &SessionFilter, row: &SessionSummary) -> bool {
        filter
            .phone
            .as_deref()
            .map_or(true, |wanted| wanted == row.phone_number)
            && filter.role.map_or(true, |role| row.role == Some(role))
            && filter.active.map_or(true, |active| row.is_active == active)
            && filter.from.map_or(true, |from| !row.created_at.is_before(&from))
            && filter.to.map_or(true, |to| !row.created_at.is_after(&to))
    }
}

#[async_trait]
impl SessionReader for InMemorySessionReader {
    async fn list(
        &self,
        filter: &SessionFilter,
        page: Page,
    ) -> Result<SessionPage, DomainError> {
        let matching: Vec<SessionSummary> = self
            .rows
            .iter()
            .filter(|row| Self::matches(filter, row))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let items: Vec<SessionSummary> = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        let has_more = (page.offset() as u64 + items.len() as u64) < total;
        Ok(SessionPage { items, total, has_more })
    }

    async fn find_by_id(
        &self,
        id: &SessionRecordId,
    ) -> Result<Option<SessionDetail>, DomainError> {
        Ok(self.rows.iter().find(|row| &row.id == id).map(|row| SessionDetail {
            summary: row.clone(),
            expires_at: row.last_interaction_at,
            input_history: vec!["1".to_string(), "10000".to_string()],
            network_code: Some("63902".to_string()),
            error_count: 0,
        }))
    }

    async fn stats(&self, _now: Timestamp) -> Result<SessionStats, DomainError> {
        let total = self.rows.len() as u64;
        let completed = self.rows.iter().filter(|r| r.completed_at.is_some()).count() as u64;
        Ok(SessionStats {
            total_sessions: total,
            active_sessions: self.rows.iter().filter(|r| r.is_active).count() as u64,
            completed_sessions: completed,
            started_today: total,
            started_this_week: total,
            by_role: vec![BreakdownRow { key: "beneficiary".to_string(), count: total }],
            by_language: vec![BreakdownRow { key: "en".to_string(), count: total }],
            average_steps: self.rows.iter().map(|r| r.step_count as f64).sum::<f64>()
                / total.max(1) as f64,
            completion_rate: completed as f64 / total.max(1) as f64,
        })
    }

    async fn export(
        &self,
        filter: &SessionFilter,
    ) -> Result<Vec<SessionSummary>, DomainError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| Self::matches(filter, row))
            .cloned()
            .collect())
    }
}

fn sample_row(phone: &str, active: bool, steps: u32) -> SessionSummary {
    SessionSummary {
        id: SessionRecordId::new(),
        session_id: format!("ATUid_{}", phone),
        phone_number: phone.to_string(),
        menu_state: MenuState::MainMenu,
        role: Some(UserRole::Beneficiary),
        language: Language::English,
        step_count: steps,
        is_active: active,
        created_at: Timestamp::from_unix_secs(1_754_000_000),
        last_interaction_at: Timestamp::from_unix_secs(1_754_000_060),
        completed_at: (!active).then(|| Timestamp::from_unix_secs(1_754_000_060)),
    }
}

fn router_with(rows: Vec<SessionSummary>) -> axum::Router {
    let reader: Arc<dyn SessionReader> = Arc::new(InMemorySessionReader { rows });
    dashboard_routes(DashboardHandlers::new(
        Arc::new(ListSessionsHandler::new(reader.clone())),
        Arc::new(GetSessionHandler::new(reader.clone())),
        Arc::new(SessionStatsHandler::new(reader.clone())),
        Arc::new(ExportSessionsHandler::new(reader)),
    ))
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn list_returns_all_rows_without_filters() {
    let router = router_with(vec![
        sample_row("254712000001", true, 2),
        sample_row("254712000002", false, 6),
    ]);

    let (status, json) = get_json(router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_filters_by_phone_and_active() {
    let router = router_with(vec![
        sample_row("254712000001", true, 2),
        sample_row("254712000002", false, 6),
    ]);

    let (status, json) = get_json(router.clone(), "/?phone=254712000002").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["phone_number"], "254712000002");

    let (_, json) = get_json(router, "/?active=true").await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["is_active"], true);
}

#[tokio::test]
async fn list_rejects_unknown_role() {
    let router = router_with(vec![]);
    let (status, json) = get_json(router, "/?role=superuser").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn detail_round_trips_and_missing_id_is_404() {
    let row = sample_row("254712000001", true, 2);
    let id = row.id;
    let router = router_with(vec![row]);

    let (status, json) = get_json(router.clone(), &format!("/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phone_number"], "254712000001");
    assert_eq!(json["input_history"].as_array().unwrap().len(), 2);

    let (status, _) = get_json(router.clone(), &format!("/{}", SessionRecordId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(router, "/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_reports_counts_and_rates() {
    let router = router_with(vec![
        sample_row("254712000001", true, 2),
        sample_row("254712000002", false, 6),
    ]);

    let (status, json) = get_json(router, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_sessions"], 2);
    assert_eq!(json["active_sessions"], 1);
    assert_eq!(json["completed_sessions"], 1);
    assert_eq!(json["completion_rate"], 0.5);
    assert_eq!(json["average_steps"], 4.0);
    assert_eq!(json["by_role"][0]["key"], "beneficiary");
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let router = router_with(vec![sample_row("254712000001", true, 2)]);

    let response = router
        .oneshot(Request::builder().uri("/export").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("session_id,phone_number,menu_state"));
    assert!(lines[1].contains("254712000001"));
}
