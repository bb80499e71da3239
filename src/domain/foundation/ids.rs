//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id! {
    /// Surrogate identifier for one persisted session row.
    ///
    /// Distinct from the gateway-assigned session id string: expiry creates
    /// a replacement row for the same gateway id, so the gateway id alone is
    /// not a primary key.
    SessionRecordId
}

uuid_id! {
    /// Identifier of a registered platform user.
    UserId
}

uuid_id! {
    /// Identifier of a beneficiary record.
    BeneficiaryId
}

uuid_id! {
    /// Identifier of a savings or business goal.
    GoalId
}

uuid_id! {
    /// Identifier of an emergency contact.
    ContactId
}

uuid_id! {
    /// Identifier of a weekly tracking record.
    TrackingRecordId
}
