// src/http_error.rs

//! User-facing message for a failed HTTP request.

use serde::Deserialize;
use serde_json::Value;

pub const CONNECTION_FAILED_MESSAGE: &str =
    "Unable to connect to the server, check your internet connection and try again.";

/// The parts of a failed response that matter for the message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorResponse {
    /// 0 when no response was received at all.
    pub status: u16,
    pub status_text: String,
    /// Parsed JSON body, if the server sent one.
    #[serde(default)]
    pub body: Option<Value>,
}

/// Best message for `err`.
///
/// Order: connection failure, then `_error.message`, then `_message`, then the
/// status text. A present non-string message is shown as JSON; `null` counts
/// as absent.
pub fn error_response_message(err: &ErrorResponse) -> String {
    if err.status == 0 {
        return CONNECTION_FAILED_MESSAGE.to_string();
    }

    let Some(body) = &err.body else {
        return err.status_text.clone();
    };

    body.pointer("/_error/message")
        .and_then(message_text)
        .or_else(|| body.get("_message").and_then(message_text))
        .unwrap_or_else(|| err.status_text.clone())
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Option<Value>) -> ErrorResponse {
        ErrorResponse {
            status,
            status_text: "Unprocessable Entity".to_string(),
            body,
        }
    }

    #[test]
    fn status_zero_is_connection_failure() {
        let err = response(0, Some(json!({"_message": "ignored"})));
        assert_eq!(error_response_message(&err), CONNECTION_FAILED_MESSAGE);
    }

    #[test]
    fn no_body_falls_back_to_status_text() {
        assert_eq!(error_response_message(&response(422, None)), "Unprocessable Entity");
    }

    #[test]
    fn nested_error_message_wins_over_message() {
        let err = response(
            422,
            Some(json!({"_error": {"message": "email taken"}, "_message": "generic"})),
        );
        assert_eq!(error_response_message(&err), "email taken");
    }

    #[test]
    fn top_level_message_used_without_nested_error() {
        let err = response(422, Some(json!({"_error": {"code": 422}, "_message": "generic"})));
        assert_eq!(error_response_message(&err), "generic");
    }

    #[test]
    fn body_without_known_fields() {
        let err = response(500, Some(json!({"detail": "boom"})));
        assert_eq!(error_response_message(&err), "Unprocessable Entity");
    }

    #[test]
    fn non_string_message_is_shown_as_json() {
        let err = response(422, Some(json!({"_message": 42})));
        assert_eq!(error_response_message(&err), "42");

        let err = response(422, Some(json!({"_error": {"message": ["a", "b"]}})));
        assert_eq!(error_response_message(&err), r#"["a","b"]"#);
    }

    #[test]
    fn null_message_falls_through() {
        let err = response(422, Some(json!({"_error": {"message": null}, "_message": null})));
        assert_eq!(error_response_message(&err), "Unprocessable Entity");
    }

    #[test]
    fn deserializes_from_json() {
        let err: ErrorResponse = serde_json::from_str(
            r#"{"status": 404, "status_text": "Not Found", "body": {"_message": "no such user"}}"#,
        )
        .unwrap();
        assert_eq!(error_response_message(&err), "no such user");
    }
}
