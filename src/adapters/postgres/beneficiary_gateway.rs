//! PostgreSQL implementation of BeneficiaryGateway.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{BeneficiaryId, DomainError, ErrorCode, UserId};
use crate::ports::BeneficiaryGateway;

/// PostgreSQL implementation of BeneficiaryGateway.
#[derive(Clone)]
pub struct PostgresBeneficiaryGateway {
    pool: PgPool,
}

impl PostgresBeneficiaryGateway {
    /// Creates a new PostgresBeneficiaryGateway.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BeneficiaryGateway for PostgresBeneficiaryGateway {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BeneficiaryId>, DomainError> {
        let row: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM beneficiaries WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to look up beneficiary: {}", e),
                    )
                })?;

        Ok(row.map(|(id,)| BeneficiaryId::from_uuid(id)))
    }
}
