//! USSD engine configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Settings for the menu session engine.
#[derive(Debug, Clone, Deserialize)]
pub struct UssdConfig {
    /// Inactivity window after which a session is treated as abandoned.
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// Service code this deployment answers, for logging only; the gateway
    /// routes by code before the request reaches us.
    #[serde(default = "default_service_code")]
    pub service_code: String,

    /// Interval of the background sweep that flips stale sessions inactive.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl UssdConfig {
    /// Validates engine settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_timeout_secs == 0 {
            return Err(ValidationError::invalid(
                "ussd.session_timeout_secs",
                "timeout must be positive",
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::invalid(
                "ussd.sweep_interval_secs",
                "sweep interval must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for UssdConfig {
    fn default() -> Self {
        Self {
            session_timeout_secs: default_session_timeout(),
            service_code: default_service_code(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_session_timeout() -> u64 {
    180
}

fn default_service_code() -> String {
    "*384*4242#".to_string()
}

fn default_sweep_interval() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = UssdConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session_timeout_secs, 180);
    }

    #[test]
    fn zero_timeout_fails() {
        let config = UssdConfig { session_timeout_secs: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
