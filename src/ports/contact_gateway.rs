//! Emergency-contact gateway port.

use crate::domain::foundation::{BeneficiaryId, ContactId, DomainError};
use crate::domain::records::{ContactSubmission, ContactSummary};
use async_trait::async_trait;

/// Gateway to the emergency-contact service.
#[async_trait]
pub trait ContactGateway: Send + Sync {
    /// List a beneficiary's most recent contacts, newest first.
    async fn list_recent(
        &self,
        beneficiary_id: &BeneficiaryId,
        limit: u32,
    ) -> Result<Vec<ContactSummary>, DomainError>;

    /// Create a contact from a confirmed draft.
    async fn create(
        &self,
        beneficiary_id: &BeneficiaryId,
        submission: &ContactSubmission,
    ) -> Result<ContactSummary, DomainError>;

    /// Designate a contact as the beneficiary's primary contact.
    ///
    /// # Errors
    ///
    /// - `ContactNotFound` if the contact doesn't exist
    async fn set_primary(&self, contact_id: &ContactId) -> Result<(), DomainError>;
}
