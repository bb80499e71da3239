//! Gateway callback DTO.
//!
//! Field names follow the telecom gateway's form encoding; an empty `text`
//! signals session start.

use serde::Deserialize;

use crate::application::handlers::ussd::UssdTurnRequest;

/// Inbound gateway callback, form-encoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UssdCallbackRequest {
    pub session_id: String,
    pub phone_number: String,
    pub service_code: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub network_code: Option<String>,
}

impl From<UssdCallbackRequest> for UssdTurnRequest {
    fn from(req: UssdCallbackRequest) -> Self {
        Self {
            session_id: req.session_id,
            phone_number: req.phone_number,
            service_code: req.service_code,
            text: req.text,
            network_code: req.network_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_gateway_camel_case_fields() {
        let req: UssdCallbackRequest = serde_json::from_value(json!({
            "sessionId": "ATUid_1",
            "phoneNumber": "+254712345678",
            "serviceCode": "*384*42#",
            "text": "1*500",
            "networkCode": "63902",
        }))
        .unwrap();

        assert_eq!(req.session_id, "ATUid_1");
        assert_eq!(req.phone_number, "+254712345678");
        assert_eq!(req.text, "1*500");
        assert_eq!(req.network_code.as_deref(), Some("63902"));
    }

    #[test]
    fn text_defaults_to_empty_on_session_start() {
        let req: UssdCallbackRequest = serde_json::from_value(json!({
            "sessionId": "ATUid_1",
            "phoneNumber": "0712345678",
            "serviceCode": "*384*42#",
        }))
        .unwrap();

        assert_eq!(req.text, "");
        assert!(req.network_code.is_none());
    }

    #[test]
    fn converts_into_turn_request() {
        let req = UssdCallbackRequest {
            session_id: "ATUid_1".to_string(),
            phone_number: "0712345678".to_string(),
            service_code: "*384*42#".to_string(),
            text: "1".to_string(),
            network_code: None,
        };
        let turn: UssdTurnRequest = req.into();
        assert_eq!(turn.session_id, "ATUid_1");
        assert_eq!(turn.text, "1");
    }
}
