//! Language enum for localized menu rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the menu engine can render in.
///
/// English is the system default; a caller's preference is carried on their
/// user record and adopted when identity is bound to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Swahili,
}

impl Language {
    /// Returns the ISO 639-1 code used in persistence and user records.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Swahili => "sw",
        }
    }

    /// Parses a language from its ISO 639-1 code.
    ///
    /// Returns `None` for unknown codes; callers fall back to the default.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "sw" => Some(Language::Swahili),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::English => "English",
            Language::Swahili => "Kiswahili",
        };
        write!(f, "{}", s)
    }
}
