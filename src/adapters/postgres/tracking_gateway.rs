//! PostgreSQL implementation of TrackingGateway.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{
    BeneficiaryId, DomainError, ErrorCode, TrackingRecordId, UserId, UserRole,
};
use crate::domain::records::WeekPayload;
use crate::ports::TrackingGateway;

/// PostgreSQL implementation of TrackingGateway.
#[derive(Clone)]
pub struct PostgresTrackingGateway {
    pool: PgPool,
}

impl PostgresTrackingGateway {
    /// Creates a new PostgresTrackingGateway.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingGateway for PostgresTrackingGateway {
    async fn submit(
        &self,
        beneficiary_id: &BeneficiaryId,
        payload: &WeekPayload,
        submitter_id: &UserId,
        submitter_role: UserRole,
    ) -> Result<TrackingRecordId, DomainError> {
        let id = TrackingRecordId::new();
        sqlx::query(
            r#"
            INSERT INTO weekly_tracking (
                id, beneficiary_id, week_ending,
                income_this_week, expenses_this_week, current_capital,
                attendance, notes, challenges, submitted_by, submitter_role
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id.as_uuid())
        .bind(beneficiary_id.as_uuid())
        .bind(payload.week_ending)
        .bind(payload.income_this_week)
        .bind(payload.expenses_this_week)
        .bind(payload.current_capital)
        .bind(payload.attendance.as_str())
        .bind(&payload.notes)
        .bind(&payload.challenges)
        .bind(submitter_id.as_uuid())
        .bind(submitter_role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert tracking record: {}", e),
            )
        })?;

        Ok(id)
    }
}
