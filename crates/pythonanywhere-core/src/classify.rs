//! Mapping of API responses onto [`Error`] variants.
//!
//! The transport applies [`authentication_error`] to every 401. Resource
//! clients check the body-shape predicates before falling back to
//! [`unexpected_status`].

use crate::error::Error;
use crate::response::ApiResponse;
use reqwest::StatusCode;
use serde_json::Value;

/// Fields searched, in order, for a human-readable message in JSON error bodies.
pub const DETAIL_FIELDS: [&str; 3] = ["detail", "message", "error"];

/// Vendor error code returned with 409 when a reload finds no CNAME.
pub const CNAME_ERROR_CODE: &str = "cname_error";

/// Build the authentication failure for a 401 response body.
#[must_use]
pub fn authentication_error(status: StatusCode, body: &str) -> Error {
    Error::Authentication(format!(
        "Authentication error {} calling API: {body}",
        status.as_u16()
    ))
}

/// Best-effort message for an error response.
///
/// Uses the first of [`DETAIL_FIELDS`] present in a JSON object body, else the
/// trimmed body text, else an empty string.
#[must_use]
pub fn extract_detail(response: &ApiResponse) -> String {
    if let Some(Value::Object(map)) = response.json_value() {
        for field in DETAIL_FIELDS {
            match map.get(field) {
                Some(Value::String(message)) => return message.clone(),
                Some(Value::Null) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }
    response.text().trim().to_string()
}

/// Generic failure for a response whose status was not expected.
#[must_use]
pub fn unexpected_status(response: &ApiResponse, context: String) -> Error {
    Error::Api {
        status: response.status().as_u16(),
        context,
        detail: extract_detail(response),
    }
}

/// Returns true for a 400 whose body reports `domain_name` as already taken.
#[must_use]
pub fn is_domain_conflict(response: &ApiResponse) -> bool {
    if response.status() != StatusCode::BAD_REQUEST {
        return false;
    }
    let Some(Value::Object(map)) = response.json_value() else {
        return false;
    };
    match map.get("domain_name") {
        Some(Value::Array(messages)) => messages
            .iter()
            .filter_map(Value::as_str)
            .any(mentions_existing),
        Some(Value::String(message)) => mentions_existing(message),
        _ => false,
    }
}

/// Returns true for a 409 carrying the [`CNAME_ERROR_CODE`] error code.
#[must_use]
pub fn is_cname_error(response: &ApiResponse) -> bool {
    response.status() == StatusCode::CONFLICT
        && response
            .json_value()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .is_some_and(|code| code == CNAME_ERROR_CODE)
}

fn mentions_existing(message: &str) -> bool {
    message.to_ascii_lowercase().contains("already exists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse::new(
            StatusCode::from_u16(status).unwrap(),
            Some("application/json".to_string()),
            Bytes::from(body.to_string()),
        )
    }

    #[test]
    fn test_authentication_message_embeds_body() {
        let err = authentication_error(StatusCode::UNAUTHORIZED, "nope");
        assert_eq!(
            err.to_string(),
            "Authentication error 401 calling API: nope"
        );
    }

    #[test]
    fn test_extract_detail_prefers_detail_then_message_then_error() {
        let body = json!({"error": "c", "message": "b", "detail": "a"}).to_string();
        assert_eq!(extract_detail(&response(400, &body)), "a");

        let body = json!({"error": "c", "message": "b"}).to_string();
        assert_eq!(extract_detail(&response(400, &body)), "b");

        let body = json!({"error": "c"}).to_string();
        assert_eq!(extract_detail(&response(400, &body)), "c");
    }

    #[test]
    fn test_extract_detail_falls_back_to_body_text() {
        let body = r#"{"interval":["This field is required."]}"#;
        assert_eq!(extract_detail(&response(400, body)), body);
        assert_eq!(extract_detail(&response(500, "an error\n")), "an error");
        assert_eq!(extract_detail(&response(404, "")), "");
    }

    #[test]
    fn test_domain_conflict_detection() {
        let body = json!({"domain_name": ["domain with this domain name already exists."]});
        assert!(is_domain_conflict(&response(400, &body.to_string())));

        let other = json!({"domain_name": ["Enter a valid domain name."]});
        assert!(!is_domain_conflict(&response(400, &other.to_string())));

        assert!(!is_domain_conflict(&response(409, &body.to_string())));
    }

    #[test]
    fn test_cname_error_detection() {
        let body = json!({"error": "cname_error"}).to_string();
        assert!(is_cname_error(&response(409, &body)));
        assert!(!is_cname_error(&response(400, &body)));

        let other = json!({"error": "something_else"}).to_string();
        assert!(!is_cname_error(&response(409, &other)));
    }

    #[test]
    fn test_unexpected_status_carries_status_and_detail() {
        let err = unexpected_status(
            &response(404, r#"{"detail": "Not found."}"#),
            "GET SSL details via API".to_string(),
        );
        assert_eq!(
            err,
            Error::Api {
                status: 404,
                context: "GET SSL details via API".to_string(),
                detail: "Not found.".to_string(),
            }
        );
    }
}
