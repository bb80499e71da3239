//! Provider/network diagnostics attached to a session.

use serde::{Deserialize, Serialize};

/// Diagnostic fields reported by the gateway; no state-machine logic reads
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Mobile network code as reported by the gateway, if any.
    #[serde(default)]
    pub network_code: Option<String>,

    /// Count of collaborator and internal failures seen during the session.
    #[serde(default)]
    pub error_count: u32,
}

impl SessionMetadata {
    /// Creates metadata from the gateway's optional network code.
    pub fn from_network_code(network_code: Option<String>) -> Self {
        Self {
            network_code,
            error_count: 0,
        }
    }

    /// Records one failure.
    pub fn record_error(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
    }
}
