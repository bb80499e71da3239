//! PostgreSQL implementation of ContactGateway.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{
    BeneficiaryId, ContactId, DomainError, ErrorCode, PhoneNumber,
};
use crate::domain::records::{ContactSubmission, ContactSummary};
use crate::ports::ContactGateway;

/// PostgreSQL implementation of ContactGateway.
#[derive(Clone)]
pub struct PostgresContactGateway {
    pool: PgPool,
}

impl PostgresContactGateway {
    /// Creates a new PostgresContactGateway.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactGateway for PostgresContactGateway {
    async fn list_recent(
        &self,
        beneficiary_id: &BeneficiaryId,
        limit: u32,
    ) -> Result<Vec<ContactSummary>, DomainError> {
        let rows: Vec<(uuid::Uuid, String, String, String, bool)> = sqlx::query_as(
            r#"
            SELECT id, name, phone_number, relationship, is_primary
            FROM emergency_contacts
            WHERE beneficiary_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(beneficiary_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("list contacts", e))?;

        rows.into_iter()
            .map(|(id, name, phone, relationship, is_primary)| {
                Ok(ContactSummary {
                    id: ContactId::from_uuid(id),
                    name,
                    phone: PhoneNumber::new(phone)
                        .map_err(|e| db_err("decode contact phone", e))?,
                    relationship,
                    is_primary,
                })
            })
            .collect()
    }

    async fn create(
        &self,
        beneficiary_id: &BeneficiaryId,
        submission: &ContactSubmission,
    ) -> Result<ContactSummary, DomainError> {
        let id = ContactId::new();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_err("begin contact transaction", e))?;

        if submission.is_primary {
            sqlx::query(
                "UPDATE emergency_contacts SET is_primary = FALSE WHERE beneficiary_id = $1",
            )
            .bind(beneficiary_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("demote existing primary contact", e))?;
        }

        sqlx::query(
            r#"
            INSERT INTO emergency_contacts
                (id, beneficiary_id, name, phone_number, relationship, address, is_primary)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id.as_uuid())
        .bind(beneficiary_id.as_uuid())
        .bind(&submission.name)
        .bind(submission.phone.as_str())
        .bind(&submission.relationship)
        .bind(&submission.address)
        .bind(submission.is_primary)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("insert contact", e))?;

        tx.commit()
            .await
            .map_err(|e| db_err("commit contact transaction", e))?;

        Ok(ContactSummary {
            id,
            name: submission.name.clone(),
            phone: submission.phone.clone(),
            relationship: submission.relationship.clone(),
            is_primary: submission.is_primary,
        })
    }

    async fn set_primary(&self, contact_id: &ContactId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_err("begin primary transaction", e))?;

        sqlx::query(
            r#"
            UPDATE emergency_contacts SET is_primary = FALSE
            WHERE beneficiary_id = (SELECT beneficiary_id FROM emergency_contacts WHERE id = $1)
            "#,
        )
        .bind(contact_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("demote existing primary contact", e))?;

        let result = sqlx::query("UPDATE emergency_contacts SET is_primary = TRUE WHERE id = $1")
            .bind(contact_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("promote primary contact", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ContactNotFound,
                format!("Contact not found: {}", contact_id),
            ));
        }

        tx.commit()
            .await
            .map_err(|e| db_err("commit primary transaction", e))?;

        Ok(())
    }
}

fn db_err(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", context, err),
    )
}
