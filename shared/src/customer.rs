use std::fmt;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::PlayerIdentity;

// === API Types ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCustomerRequest {
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub wheel_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyCustomerResponse {
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub wheel_id: String,
    pub prize: String,
}

/// Error body returned by the backend on a rejected request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl VerifyCustomerRequest {
    pub fn new(identity: &PlayerIdentity, wheel_id: &str) -> Self {
        Self {
            first_name: identity.first_name.clone(),
            email: identity.email.clone(),
            phone: identity.phone.clone(),
            wheel_id: wheel_id.to_string(),
        }
    }
}

impl CreateCustomerRequest {
    pub fn new(identity: &PlayerIdentity, wheel_id: &str, prize: &str) -> Self {
        Self {
            first_name: identity.first_name.clone(),
            email: identity.email.clone(),
            phone: identity.phone.clone(),
            wheel_id: wheel_id.to_string(),
            prize: prize.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with an `{ "error": ... }` body.
    Rejected(String),
    Status(u16),
    Network(String),
    Decode(String),
    Timeout,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Rejected(message) => write!(f, "request rejected: {}", message),
            ApiError::Status(code) => write!(f, "unexpected status {}", code),
            ApiError::Network(detail) => write!(f, "network error: {}", detail),
            ApiError::Decode(detail) => write!(f, "malformed response: {}", detail),
            ApiError::Timeout => f.write_str("request timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Parses a non-success response body, falling back to the status code.
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => ApiError::Rejected(parsed.error),
        _ => ApiError::Status(status),
    }
}

/// Parses a 2xx body. An embedded `error` field still counts as a rejection.
pub fn success_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(ApiError::Rejected(error.to_string()));
    }
    Ok(value)
}

/// Customer endpoints the spin session talks to.
///
/// Returned futures are `'static` so a completed spin can hand the
/// persistence call to a detached task.
pub trait CustomerApi {
    fn verify_customer(
        &self,
        request: VerifyCustomerRequest,
    ) -> LocalBoxFuture<'static, Result<VerifyCustomerResponse, ApiError>>;

    fn create_customer(&self, request: CreateCustomerRequest) -> LocalBoxFuture<'static, Result<(), ApiError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_use_camel_case_keys() {
        let identity = PlayerIdentity {
            first_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "5550100".to_string(),
        };
        let body = serde_json::to_value(CreateCustomerRequest::new(&identity, "w1", "Free coffee")).unwrap();
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body["wheelId"], "w1");
        assert_eq!(body["prize"], "Free coffee");
    }

    #[test]
    fn test_error_body_parsing() {
        assert_eq!(
            error_from_body(400, r#"{"error":"Email already registered"}"#),
            ApiError::Rejected("Email already registered".to_string())
        );
        assert_eq!(error_from_body(500, "<html>oops</html>"), ApiError::Status(500));
        assert_eq!(error_from_body(400, r#"{"error":"  "}"#), ApiError::Status(400));
    }

    #[test]
    fn test_success_body_with_error_field_is_a_rejection() {
        assert_eq!(
            success_body(r#"{"verified": false, "error": "Phone number already registered"}"#),
            Err(ApiError::Rejected("Phone number already registered".to_string()))
        );
        assert_eq!(success_body(r#"{"verified": true}"#).unwrap()["verified"], true);
        assert_eq!(success_body("  "), Ok(Value::Null));
        assert!(matches!(success_body("not json"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_verify_response_defaults_to_unverified() {
        let parsed: VerifyCustomerResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.verified);
    }
}
