//! Weekly-tracking gateway port.

use crate::domain::foundation::{BeneficiaryId, DomainError, TrackingRecordId, UserId, UserRole};
use crate::domain::records::WeekPayload;
use async_trait::async_trait;

/// Gateway to the weekly-tracking service.
#[async_trait]
pub trait TrackingGateway: Send + Sync {
    /// Submit one week of tracking figures.
    ///
    /// Called at most once per confirm action per turn; the engine performs
    /// no automatic retry.
    async fn submit(
        &self,
        beneficiary_id: &BeneficiaryId,
        payload: &WeekPayload,
        submitter_id: &UserId,
        submitter_role: UserRole,
    ) -> Result<TrackingRecordId, DomainError>;
}
