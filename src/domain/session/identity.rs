//! Resolved caller identity cached on a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BeneficiaryId, UserId, UserRole};

/// The domain identity a phone number resolved to.
///
/// Bound once per session by the identity binder and immutable afterwards.
/// `beneficiary_id` is present only when the role is beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub user_id: UserId,
    pub role: UserRole,
    pub beneficiary_id: Option<BeneficiaryId>,
}

impl CallerIdentity {
    /// Creates an identity for a beneficiary caller.
    pub fn beneficiary(user_id: UserId, beneficiary_id: BeneficiaryId) -> Self {
        Self {
            user_id,
            role: UserRole::Beneficiary,
            beneficiary_id: Some(beneficiary_id),
        }
    }

    /// Creates an identity for a non-beneficiary caller.
    pub fn non_beneficiary(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            beneficiary_id: None,
        }
    }
}
