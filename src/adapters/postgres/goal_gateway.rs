//! PostgreSQL implementation of GoalGateway.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{BeneficiaryId, DomainError, ErrorCode, GoalId};
use crate::domain::records::{GoalSubmission, GoalSummary, GoalType};
use crate::ports::GoalGateway;

/// PostgreSQL implementation of GoalGateway.
#[derive(Clone)]
pub struct PostgresGoalGateway {
    pool: PgPool,
}

impl PostgresGoalGateway {
    /// Creates a new PostgresGoalGateway.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalGateway for PostgresGoalGateway {
    async fn list_recent(
        &self,
        beneficiary_id: &BeneficiaryId,
        limit: u32,
    ) -> Result<Vec<GoalSummary>, DomainError> {
        let rows: Vec<(uuid::Uuid, String, String, i64, chrono::NaiveDate)> = sqlx::query_as(
            r#"
            SELECT id, goal_type, description, target_amount, target_date
            FROM goals
            WHERE beneficiary_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(beneficiary_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("list goals", e))?;

        rows.into_iter()
            .map(|(id, goal_type, description, target_amount, target_date)| {
                Ok(GoalSummary {
                    id: GoalId::from_uuid(id),
                    goal_type: parse_goal_type(&goal_type)?,
                    description,
                    target_amount,
                    target_date,
                })
            })
            .collect()
    }

    async fn create(
        &self,
        beneficiary_id: &BeneficiaryId,
        submission: &GoalSubmission,
    ) -> Result<GoalSummary, DomainError> {
        let id = GoalId::new();
        sqlx::query(
            r#"
            INSERT INTO goals (id, beneficiary_id, goal_type, description, target_amount, target_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.as_uuid())
        .bind(beneficiary_id.as_uuid())
        .bind(submission.goal_type.as_str())
        .bind(&submission.description)
        .bind(submission.target_amount)
        .bind(submission.target_date)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("insert goal", e))?;

        Ok(GoalSummary {
            id,
            goal_type: submission.goal_type,
            description: submission.description.clone(),
            target_amount: submission.target_amount,
            target_date: submission.target_date,
        })
    }
}

fn db_err(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", context, err),
    )
}

fn parse_goal_type(s: &str) -> Result<GoalType, DomainError> {
    GoalType::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid goal type: {}", s),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_goal_type_roundtrips() {
        for gt in [
            GoalType::Business,
            GoalType::Education,
            GoalType::Health,
            GoalType::Housing,
            GoalType::Other,
        ] {
            assert_eq!(parse_goal_type(gt.as_str()).unwrap(), gt);
        }
        assert!(parse_goal_type("retirement").is_err());
    }
}
