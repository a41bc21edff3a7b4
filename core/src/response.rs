//! Classification of service responses.
//!
//! # Design
//! [`classify`] is a pure function from (HTTP status, parsed JSON body) to
//! a terminal result, written as one ordered match. The order is a
//! contract: the 200/200 and 200/210 arms are tried before the blanket 500
//! and 400 arms, which are tried before the fallback. Reordering changes
//! which branch wins for ambiguous bodies — a 200 response with no
//! `status_code` must land on `Unknown`, not on the 210 arm.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Description string the service quirk fixes for every 210 result.
const ARGUMENT_ERROR_DESCRIPTION: &str = "Argument error";

/// Service-reported argument error (status_code 210 under HTTP 200).
///
/// The upstream protocol delivers its own validation failures as a
/// *successful* completion carrying this payload; the quirk is preserved
/// exactly, not mapped onto the error channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentError {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub code: u16,
}

impl ArgumentError {
    fn new(detail: Option<String>) -> Self {
        Self {
            description: ARGUMENT_ERROR_DESCRIPTION.to_string(),
            detail,
            code: 210,
        }
    }
}

/// Successful completion of a remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// The `response` payload of a 200/200 envelope; `Value::Null` when the
    /// service sent none.
    Success(Value),
    /// A 200/210 envelope.
    ArgumentError(ArgumentError),
}

impl ApiResponse {
    /// Payload of a `Success`, if that is what this is.
    pub fn success(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success(payload) => Some(payload),
            ApiResponse::ArgumentError(_) => None,
        }
    }
}

/// Map a transport outcome to exactly one terminal result.
///
/// | HTTP status | service `status_code` | result |
/// |---|---|---|
/// | 200 | 200 | `Ok(Success(body.response))` |
/// | 200 | 210 | `Ok(ArgumentError{..})` |
/// | 500 | any | `Err(Internal)` |
/// | 400 | any | `Err(Malformed)` |
/// | other | any | `Err(Unknown)` |
pub fn classify(status: u16, body: &Value) -> Result<ApiResponse, Error> {
    let service_code = body.get("status_code").and_then(Value::as_u64);
    match (status, service_code) {
        (200, Some(200)) => Ok(ApiResponse::Success(
            body.get("response").cloned().unwrap_or(Value::Null),
        )),
        (200, Some(210)) => Ok(ApiResponse::ArgumentError(ArgumentError::new(
            body.get("status_message")
                .and_then(Value::as_str)
                .map(str::to_string),
        ))),
        (500, _) => Err(Error::Internal),
        (400, _) => Err(Error::Malformed),
        _ => Err(Error::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_yields_response_payload() {
        let body = json!({"status_code": 200, "response": {"Messages": ["abc"]}});
        let result = classify(200, &body).unwrap();
        assert_eq!(result, ApiResponse::Success(json!({"Messages": ["abc"]})));
    }

    #[test]
    fn ok_envelope_without_response_yields_null() {
        let body = json!({"status_code": 200});
        let result = classify(200, &body).unwrap();
        assert_eq!(result, ApiResponse::Success(Value::Null));
    }

    #[test]
    fn service_210_is_a_success_value() {
        let body = json!({"status_code": 210, "status_message": "Oops"});
        let result = classify(200, &body).unwrap();
        assert_eq!(
            result,
            ApiResponse::ArgumentError(ArgumentError {
                description: "Argument error".to_string(),
                detail: Some("Oops".to_string()),
                code: 210,
            })
        );
    }

    #[test]
    fn service_210_without_message_has_no_detail() {
        let body = json!({"status_code": 210});
        match classify(200, &body).unwrap() {
            ApiResponse::ArgumentError(err) => assert_eq!(err.detail, None),
            other => panic!("expected argument error, got {other:?}"),
        }
    }

    #[test]
    fn http_500_is_internal_regardless_of_body() {
        assert_eq!(classify(500, &json!({"status_code": 200})), Err(Error::Internal));
        assert_eq!(classify(500, &json!({})), Err(Error::Internal));
        assert_eq!(classify(500, &Value::Null), Err(Error::Internal));
    }

    #[test]
    fn http_400_is_malformed_regardless_of_body() {
        assert_eq!(classify(400, &json!({"status_code": 210})), Err(Error::Malformed));
        assert_eq!(classify(400, &Value::Null), Err(Error::Malformed));
    }

    // Order contract: a 200 with no (or an unexpected) service status_code
    // must fall through to Unknown, never match the 210 arm.
    #[test]
    fn http_200_without_service_code_is_unknown() {
        assert_eq!(classify(200, &json!({})), Err(Error::Unknown));
        assert_eq!(classify(200, &json!({"status_message": "Oops"})), Err(Error::Unknown));
        assert_eq!(classify(200, &Value::Null), Err(Error::Unknown));
    }

    #[test]
    fn http_200_with_unexpected_service_code_is_unknown() {
        assert_eq!(classify(200, &json!({"status_code": 404})), Err(Error::Unknown));
    }

    #[test]
    fn unmapped_http_status_is_unknown() {
        assert_eq!(classify(404, &json!({"status_code": 200})), Err(Error::Unknown));
        assert_eq!(classify(302, &Value::Null), Err(Error::Unknown));
    }
}
