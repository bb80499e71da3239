//! PostgreSQL implementation of IdentityGateway.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{
    DomainError, ErrorCode, Language, PhoneNumber, UserId,
};
use crate::domain::records::RegisteredUser;
use crate::ports::IdentityGateway;

use super::session_repository::{parse_language, parse_role};

/// PostgreSQL implementation of IdentityGateway.
#[derive(Clone)]
pub struct PostgresIdentityGateway {
    pool: PgPool,
}

impl PostgresIdentityGateway {
    /// Creates a new PostgresIdentityGateway.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityGateway for PostgresIdentityGateway {
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<RegisteredUser>, DomainError> {
        let row: Option<(uuid::Uuid, String, String)> =
            sqlx::query_as("SELECT id, role, language FROM users WHERE phone_number = $1")
                .bind(phone.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to look up user by phone: {}", e),
                    )
                })?;

        match row {
            Some((id, role, language)) => Ok(Some(RegisteredUser {
                user_id: UserId::from_uuid(id),
                role: parse_role(&role)?,
                language: parse_language(&language)?,
            })),
            None => Ok(None),
        }
    }

    async fn update_language(
        &self,
        user_id: &UserId,
        language: Language,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET language = $2 WHERE id = $1")
            .bind(user_id.as_uuid())
            .bind(language.code())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to update user language: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user_id),
            ));
        }

        Ok(())
    }
}
