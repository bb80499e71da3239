//! PostgreSQL implementation of SessionReader.
//!
//! Read-only queries over the session log for the admin dashboard. Filters
//! use nullable binds so the SQL stays static.

use async_trait::async_trait;
use chrono::{Datelike, Duration};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, SessionRecordId, Timestamp};
use crate::domain::session::FlowData;
use crate::ports::{
    BreakdownRow, Page, SessionDetail, SessionFilter, SessionPage, SessionReader, SessionStats,
    SessionSummary,
};

use super::session_repository::{parse_language, parse_menu_state, parse_role};

const FILTER_CLAUSE: &str = r#"
    ($1::text IS NULL OR phone_number = $1)
    AND ($2::text IS NULL OR role = $2)
    AND ($3::boolean IS NULL OR is_active = $3)
    AND ($4::timestamptz IS NULL OR created_at >= $4)
    AND ($5::timestamptz IS NULL OR created_at <= $5)
"#;

/// PostgreSQL implementation of SessionReader.
#[derive(Clone)]
pub struct PostgresSessionReader {
    pool: PgPool,
}

impl PostgresSessionReader {
    /// Creates a new PostgresSessionReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionReader for PostgresSessionReader {
    async fn list(
        &self,
        filter: &SessionFilter,
        page: Page,
    ) -> Result<SessionPage, DomainError> {
        let count_sql = format!("SELECT COUNT(*) FROM ussd_sessions WHERE {}", FILTER_CLAUSE);
        let total: (i64,) = sqlx::query_as(&count_sql)
            .bind_filter(filter)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("count sessions", e))?;

        let list_sql = format!(
            r#"
            SELECT id, session_id, phone_number, menu_state, role, language,
                   step_count, is_active, created_at, last_interaction_at, completed_at
            FROM ussd_sessions
            WHERE {}
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
            FILTER_CLAUSE
        );
        let rows = sqlx::query(&list_sql)
            .bind_filter(filter)
            .bind(page.per_page as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("list sessions", e))?;

        let items: Result<Vec<SessionSummary>, DomainError> =
            rows.into_iter().map(row_to_summary).collect();
        let items = items?;

        let seen = page.offset() as u64 + items.len() as u64;
        Ok(SessionPage {
            items,
            total: total.0 as u64,
            has_more: seen < total.0 as u64,
        })
    }

    async fn find_by_id(
        &self,
        id: &SessionRecordId,
    ) -> Result<Option<SessionDetail>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, phone_number, menu_state, role, language,
                   step_count, is_active, created_at, last_interaction_at, completed_at,
                   expires_at, flow_data, network_code, error_count
            FROM ussd_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("fetch session detail", e))?;

        let Some(row) = row else { return Ok(None) };

        let expires_at: chrono::DateTime<chrono::Utc> = row
            .try_get("expires_at")
            .map_err(|e| db_err("get expires_at", e))?;
        let flow_data: serde_json::Value = row
            .try_get("flow_data")
            .map_err(|e| db_err("get flow_data", e))?;
        let network_code: Option<String> = row
            .try_get("network_code")
            .map_err(|e| db_err("get network_code", e))?;
        let error_count: i32 = row
            .try_get("error_count")
            .map_err(|e| db_err("get error_count", e))?;

        let flow: FlowData =
            serde_json::from_value(flow_data).map_err(|e| db_err("decode flow data", e))?;

        Ok(Some(SessionDetail {
            summary: row_to_summary(row)?,
            expires_at: Timestamp::from_datetime(expires_at),
            input_history: flow.input_history,
            network_code,
            error_count: error_count as u32,
        }))
    }

    async fn stats(&self, now: Timestamp) -> Result<SessionStats, DomainError> {
        let today_start = start_of_day(now);
        let week_start = Timestamp::from_datetime(
            *today_start.as_datetime()
                - Duration::days(now.as_datetime().weekday().num_days_from_monday() as i64),
        );

        let counters: (i64, i64, i64, i64, i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE is_active),
                   COUNT(*) FILTER (WHERE completed_at IS NOT NULL),
                   COUNT(*) FILTER (WHERE created_at >= $1),
                   COUNT(*) FILTER (WHERE created_at >= $2),
                   AVG(step_count)::float8
            FROM ussd_sessions
            "#,
        )
        .bind(today_start.as_datetime())
        .bind(week_start.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("compute session counters", e))?;

        let by_role = self
            .breakdown("SELECT COALESCE(role, 'unknown'), COUNT(*) FROM ussd_sessions GROUP BY 1 ORDER BY 2 DESC")
            .await?;
        let by_language = self
            .breakdown("SELECT language, COUNT(*) FROM ussd_sessions GROUP BY 1 ORDER BY 2 DESC")
            .await?;

        let (total, active, completed, today, this_week, avg_steps) = counters;
        let completion_rate = if total > 0 {
            completed as f64 / total as f64
        } else {
            0.0
        };

        Ok(SessionStats {
            total_sessions: total as u64,
            active_sessions: active as u64,
            completed_sessions: completed as u64,
            started_today: today as u64,
            started_this_week: this_week as u64,
            by_role,
            by_language,
            average_steps: avg_steps.unwrap_or(0.0),
            completion_rate,
        })
    }

    async fn export(
        &self,
        filter: &SessionFilter,
    ) -> Result<Vec<SessionSummary>, DomainError> {
        let export_sql = format!(
            r#"
            SELECT id, session_id, phone_number, menu_state, role, language,
                   step_count, is_active, created_at, last_interaction_at, completed_at
            FROM ussd_sessions
            WHERE {}
            ORDER BY created_at DESC
            "#,
            FILTER_CLAUSE
        );
        let rows = sqlx::query(&export_sql)
            .bind_filter(filter)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("export sessions", e))?;

        rows.into_iter().map(row_to_summary).collect()
    }
}

impl PostgresSessionReader {
    async fn breakdown(&self, sql: &str) -> Result<Vec<BreakdownRow>, DomainError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("compute breakdown", e))?;
        Ok(rows
            .into_iter()
            .map(|(key, count)| BreakdownRow { key, count: count as u64 })
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

trait FilterBinds: Sized {
    fn bind_filter(self, filter: &SessionFilter) -> Self;
}

impl<'q, O> FilterBinds
    for sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>
{
    fn bind_filter(self, filter: &SessionFilter) -> Self {
        self.bind(filter.phone.clone())
            .bind(filter.role.map(|r| r.as_str()))
            .bind(filter.active)
            .bind(filter.from.map(|t| *t.as_datetime()))
            .bind(filter.to.map(|t| *t.as_datetime()))
    }
}

impl<'q> FilterBinds for sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    fn bind_filter(self, filter: &SessionFilter) -> Self {
        self.bind(filter.phone.clone())
            .bind(filter.role.map(|r| r.as_str()))
            .bind(filter.active)
            .bind(filter.from.map(|t| *t.as_datetime()))
            .bind(filter.to.map(|t| *t.as_datetime()))
    }
}

fn db_err(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", context, err),
    )
}

fn start_of_day(now: Timestamp) -> Timestamp {
    let midnight = now
        .as_datetime()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc();
    Timestamp::from_datetime(midnight)
}

fn row_to_summary(row: sqlx::postgres::PgRow) -> Result<SessionSummary, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| db_err("get id", e))?;
    let session_id: String = row
        .try_get("session_id")
        .map_err(|e| db_err("get session_id", e))?;
    let phone_number: String = row
        .try_get("phone_number")
        .map_err(|e| db_err("get phone_number", e))?;
    let menu_state: String = row
        .try_get("menu_state")
        .map_err(|e| db_err("get menu_state", e))?;
    let role: Option<String> = row.try_get("role").map_err(|e| db_err("get role", e))?;
    let language: String = row
        .try_get("language")
        .map_err(|e| db_err("get language", e))?;
    let step_count: i32 = row
        .try_get("step_count")
        .map_err(|e| db_err("get step_count", e))?;
    let is_active: bool = row
        .try_get("is_active")
        .map_err(|e| db_err("get is_active", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| db_err("get created_at", e))?;
    let last_interaction_at: chrono::DateTime<chrono::Utc> = row
        .try_get("last_interaction_at")
        .map_err(|e| db_err("get last_interaction_at", e))?;
    let completed_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("completed_at")
        .map_err(|e| db_err("get completed_at", e))?;

    Ok(SessionSummary {
        id: SessionRecordId::from_uuid(id),
        session_id,
        phone_number,
        menu_state: parse_menu_state(&menu_state)?,
        role: role.as_deref().map(parse_role).transpose()?,
        language: parse_language(&language)?,
        step_count: step_count as u32,
        is_active,
        created_at: Timestamp::from_datetime(created_at),
        last_interaction_at: Timestamp::from_datetime(last_interaction_at),
        completed_at: completed_at.map(Timestamp::from_datetime),
    })
}
