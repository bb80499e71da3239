//! Goal gateway port.

use crate::domain::foundation::{BeneficiaryId, DomainError};
use crate::domain::records::{GoalSubmission, GoalSummary};
use async_trait::async_trait;

/// Gateway to the goal service.
#[async_trait]
pub trait GoalGateway: Send + Sync {
    /// List a beneficiary's most recent goals, newest first.
    async fn list_recent(
        &self,
        beneficiary_id: &BeneficiaryId,
        limit: u32,
    ) -> Result<Vec<GoalSummary>, DomainError>;

    /// Create a goal from a confirmed draft.
    ///
    /// # Errors
    ///
    /// - `GatewayError` / `DatabaseError` on failure; the draft is not
    ///   retried by the engine
    async fn create(
        &self,
        beneficiary_id: &BeneficiaryId,
        submission: &GoalSubmission,
    ) -> Result<GoalSummary, DomainError>;
}
