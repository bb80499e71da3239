//! Phone number value object with Kenyan mobile validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A validated Kenyan mobile number, stored in canonical `2547XXXXXXXX` /
/// `2541XXXXXXXX` form.
///
/// Accepted input shapes: `+2547…`, `2547…`, `07…`, `7…` (and the `1`-prefix
/// Safaricom ranges). Everything else is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a phone number, normalizing to canonical form.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the input is empty
    /// - `InvalidFormat` if the input is not a Kenyan mobile number
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("phone_number"));
        }
        match normalize(trimmed) {
            Some(canonical) => Ok(Self(canonical)),
            None => Err(ValidationError::invalid_format(
                "phone_number",
                format!("'{}' is not a Kenyan mobile number", trimmed),
            )),
        }
    }

    /// Returns the canonical number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns true if the input would be accepted by [`PhoneNumber::new`].
///
/// Used by the contact flow to validate user-entered numbers before storing
/// them into the draft.
pub fn is_valid_kenyan_mobile(raw: &str) -> bool {
    normalize(raw.trim()).is_some()
}

/// Normalizes to `254` + 9 digits, first digit 7 or 1.
fn normalize(input: &str) -> Option<String> {
    let digits = input.strip_prefix('+').unwrap_or(input);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let subscriber = if let Some(rest) = digits.strip_prefix("254") {
        rest
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        digits
    };

    if subscriber.len() != 9 {
        return None;
    }
    if !subscriber.starts_with('7') && !subscriber.starts_with('1') {
        return None;
    }

    Some(format!("254{}", subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_international_form() {
        let phone = PhoneNumber::new("+254712345678").unwrap();
        assert_eq!(phone.as_str(), "254712345678");
    }

    #[test]
    fn accepts_country_code_without_plus() {
        let phone = PhoneNumber::new("254712345678").unwrap();
        assert_eq!(phone.as_str(), "254712345678");
    }

    #[test]
    fn accepts_local_form_with_leading_zero() {
        let phone = PhoneNumber::new("0712345678").unwrap();
        assert_eq!(phone.as_str(), "254712345678");
    }

    #[test]
    fn accepts_bare_subscriber_number() {
        let phone = PhoneNumber::new("712345678").unwrap();
        assert_eq!(phone.as_str(), "254712345678");
    }

    #[test]
    fn accepts_one_prefix_ranges() {
        let phone = PhoneNumber::new("0110123456").unwrap();
        assert_eq!(phone.as_str(), "254110123456");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            PhoneNumber::new(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn rejects_non_mobile_prefix() {
        assert!(PhoneNumber::new("0212345678").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(PhoneNumber::new("07123").is_err());
        assert!(PhoneNumber::new("07123456789").is_err());
    }

    #[test]
    fn rejects_letters() {
        assert!(PhoneNumber::new("07123abc78").is_err());
    }

    #[test]
    fn is_valid_kenyan_mobile_agrees_with_constructor() {
        assert!(is_valid_kenyan_mobile("0712345678"));
        assert!(!is_valid_kenyan_mobile("12345"));
    }
}
