//! PostgreSQL implementation of SessionRepository.
//!
//! The flow accumulator, back slot, and input trail persist as one JSONB
//! document; everything else is a plain column.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    BeneficiaryId, DomainError, ErrorCode, Language, PhoneNumber, SessionRecordId, Timestamp,
    UserId, UserRole,
};
use crate::domain::session::{
    CallerIdentity, FlowData, MenuState, SessionMetadata, UssdSession,
};
use crate::ports::SessionRepository;

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a new PostgresSessionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: &UssdSession) -> Result<(), DomainError> {
        let flow = flow_to_json(session.flow_data())?;
        sqlx::query(
            r#"
            INSERT INTO ussd_sessions (
                id, session_id, phone_number, menu_state,
                user_id, role, beneficiary_id, language, step_count, flow_data,
                created_at, last_interaction_at, expires_at,
                is_active, completed_at, network_code, error_count
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.session_id())
        .bind(session.phone_number().as_str())
        .bind(session.menu_state().as_str())
        .bind(session.identity().map(|i| *i.user_id.as_uuid()))
        .bind(session.identity().map(|i| i.role.as_str()))
        .bind(session.identity().and_then(|i| i.beneficiary_id).map(|b| *b.as_uuid()))
        .bind(session.language().code())
        .bind(session.step_count() as i32)
        .bind(flow)
        .bind(session.created_at().as_datetime())
        .bind(session.last_interaction_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(session.is_active())
        .bind(session.completed_at().map(|t| *t.as_datetime()))
        .bind(session.metadata().network_code.as_deref())
        .bind(session.metadata().error_count as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("insert session", e))?;

        Ok(())
    }

    async fn update(&self, session: &UssdSession) -> Result<(), DomainError> {
        let flow = flow_to_json(session.flow_data())?;
        let result = sqlx::query(
            r#"
            UPDATE ussd_sessions SET
                menu_state = $2,
                user_id = $3,
                role = $4,
                beneficiary_id = $5,
                language = $6,
                step_count = $7,
                flow_data = $8,
                last_interaction_at = $9,
                expires_at = $10,
                is_active = $11,
                completed_at = $12,
                error_count = $13
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.menu_state().as_str())
        .bind(session.identity().map(|i| *i.user_id.as_uuid()))
        .bind(session.identity().map(|i| i.role.as_str()))
        .bind(session.identity().and_then(|i| i.beneficiary_id).map(|b| *b.as_uuid()))
        .bind(session.language().code())
        .bind(session.step_count() as i32)
        .bind(flow)
        .bind(session.last_interaction_at().as_datetime())
        .bind(session.expires_at().as_datetime())
        .bind(session.is_active())
        .bind(session.completed_at().map(|t| *t.as_datetime()))
        .bind(session.metadata().error_count as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("update session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }

        Ok(())
    }

    async fn find_current(&self, session_id: &str) -> Result<Option<UssdSession>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, phone_number, menu_state,
                   user_id, role, beneficiary_id, language, step_count, flow_data,
                   created_at, last_interaction_at, expires_at,
                   is_active, completed_at, network_code, error_count
            FROM ussd_sessions
            WHERE session_id = $1 AND is_active
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("fetch session", e))?;

        match row {
            Some(row) => Ok(Some(row_to_session(row)?)),
            None => Ok(None),
        }
    }

    async fn deactivate_stale(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE ussd_sessions SET is_active = FALSE WHERE is_active AND expires_at < $1",
        )
        .bind(cutoff.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("deactivate stale sessions", e))?;

        Ok(result.rows_affected())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_err(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", context, err),
    )
}

fn flow_to_json(flow: &FlowData) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(flow).map_err(|e| db_err("serialize flow data", e))
}

pub(super) fn parse_menu_state(s: &str) -> Result<MenuState, DomainError> {
    MenuState::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid menu state: {}", s),
        )
    })
}

pub(super) fn parse_role(s: &str) -> Result<UserRole, DomainError> {
    UserRole::parse(s).ok_or_else(|| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid role: {}", s))
    })
}

pub(super) fn parse_language(s: &str) -> Result<Language, DomainError> {
    Language::from_code(s).ok_or_else(|| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid language: {}", s))
    })
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<UssdSession, DomainError> {
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
    let user_id: Option<uuid::Uuid> =
        row.try_get("user_id").map_err(|e| db_err("get user_id", e))?;
    let role: Option<String> = row.try_get("role").map_err(|e| db_err("get role", e))?;
    let beneficiary_id: Option<uuid::Uuid> = row
        .try_get("beneficiary_id")
        .map_err(|e| db_err("get beneficiary_id", e))?;
    let language: String = row
        .try_get("language")
        .map_err(|e| db_err("get language", e))?;
    let step_count: i32 = row
        .try_get("step_count")
        .map_err(|e| db_err("get step_count", e))?;
    let flow_data: serde_json::Value = row
        .try_get("flow_data")
        .map_err(|e| db_err("get flow_data", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| db_err("get created_at", e))?;
    let last_interaction_at: chrono::DateTime<chrono::Utc> = row
        .try_get("last_interaction_at")
        .map_err(|e| db_err("get last_interaction_at", e))?;
    let expires_at: chrono::DateTime<chrono::Utc> = row
        .try_get("expires_at")
        .map_err(|e| db_err("get expires_at", e))?;
    let is_active: bool = row
        .try_get("is_active")
        .map_err(|e| db_err("get is_active", e))?;
    let completed_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("completed_at")
        .map_err(|e| db_err("get completed_at", e))?;
    let network_code: Option<String> = row
        .try_get("network_code")
        .map_err(|e| db_err("get network_code", e))?;
    let error_count: i32 = row
        .try_get("error_count")
        .map_err(|e| db_err("get error_count", e))?;

    let identity = match (user_id, role) {
        (Some(user_id), Some(role)) => Some(CallerIdentity {
            user_id: UserId::from_uuid(user_id),
            role: parse_role(&role)?,
            beneficiary_id: beneficiary_id.map(BeneficiaryId::from_uuid),
        }),
        _ => None,
    };

    let flow: FlowData =
        serde_json::from_value(flow_data).map_err(|e| db_err("decode flow data", e))?;

    Ok(UssdSession::reconstitute(
        SessionRecordId::from_uuid(id),
        session_id,
        PhoneNumber::new(phone_number).map_err(|e| db_err("decode phone_number", e))?,
        parse_menu_state(&menu_state)?,
        identity,
        parse_language(&language)?,
        step_count as u32,
        flow,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(last_interaction_at),
        Timestamp::from_datetime(expires_at),
        is_active,
        completed_at.map(Timestamp::from_datetime),
        SessionMetadata {
            network_code,
            error_count: error_count as u32,
        },
    ))
}
