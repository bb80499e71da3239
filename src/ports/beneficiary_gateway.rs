//! Beneficiary gateway port.

use crate::domain::foundation::{BeneficiaryId, DomainError, UserId};
use async_trait::async_trait;

/// Gateway to beneficiary records.
#[async_trait]
pub trait BeneficiaryGateway: Send + Sync {
    /// Resolve the beneficiary record owned by a user.
    ///
    /// Returns `None` when the user has no beneficiary record (registered
    /// but not enrolled).
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BeneficiaryId>, DomainError>;
}
