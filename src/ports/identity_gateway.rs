//! Identity gateway port.
//!
//! Resolves callers to registered platform users and persists their
//! language preference.

use crate::domain::foundation::{DomainError, Language, PhoneNumber, UserId};
use crate::domain::records::RegisteredUser;
use async_trait::async_trait;

/// Gateway to the platform's user registry.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Look up a registered user by phone number.
    ///
    /// Returns `None` when the number is not registered; the engine then
    /// terminates the session with a not-registered message.
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<RegisteredUser>, DomainError>;

    /// Persist a user's language preference.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_language(
        &self,
        user_id: &UserId,
        language: Language,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn IdentityGateway) {}
    }
}
