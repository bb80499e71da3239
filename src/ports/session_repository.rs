//! Session repository port (write side).
//!
//! The session row is the only durability boundary of the engine: one full
//! write-back per turn, no finer-grained persistence.

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::session::UssdSession;
use async_trait::async_trait;

/// Repository port for session persistence.
///
/// Implementations must treat the row as append-or-overwrite only; sessions
/// are deactivated, never deleted.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a newly created session row.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, session: &UssdSession) -> Result<(), DomainError>;

    /// Overwrite an existing session row with the full aggregate state.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the row doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &UssdSession) -> Result<(), DomainError>;

    /// Find the current generation for a gateway session id.
    ///
    /// When expiry has created replacement rows, the most recently created
    /// active row wins; returns `None` if the id has never been seen or
    /// every generation is inactive.
    async fn find_current(&self, session_id: &str) -> Result<Option<UssdSession>, DomainError>;

    /// Flip active sessions whose stored deadline passed before `cutoff` to
    /// inactive, for reporting hygiene. Conversational expiry does not
    /// depend on this; it is detected lazily on the next turn.
    ///
    /// Returns the number of rows swept.
    async fn deactivate_stale(&self, cutoff: Timestamp) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
