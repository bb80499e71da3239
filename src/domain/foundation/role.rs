//! User roles recognized by the platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried on a registered user record.
///
/// Only beneficiaries interact with the USSD menu; mentors and staff use the
/// web application and are turned away with a role-unsupported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Beneficiary,
    Mentor,
    Staff,
}

impl UserRole {
    /// Returns true if this role may drive the interactive menu.
    pub fn is_interactive(&self) -> bool {
        matches!(self, UserRole::Beneficiary)
    }

    /// Returns the persistence string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Beneficiary => "beneficiary",
            UserRole::Mentor => "mentor",
            UserRole::Staff => "staff",
        }
    }

    /// Parses a role from its persistence string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beneficiary" => Some(UserRole::Beneficiary),
            "mentor" => Some(UserRole::Mentor),
            "staff" => Some(UserRole::Staff),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_beneficiary_is_interactive() {
        assert!(UserRole::Beneficiary.is_interactive());
        assert!(!UserRole::Mentor.is_interactive());
        assert!(!UserRole::Staff.is_interactive());
    }

    #[test]
    fn as_str_roundtrips_through_parse() {
        for role in [UserRole::Beneficiary, UserRole::Mentor, UserRole::Staff] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(UserRole::parse("admin"), None);
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::Beneficiary).unwrap(),
            "\"beneficiary\""
        );
    }
}
