//! Wire types for the `/chat` endpoint.

use serde::Serialize;
use serde_json::Value;

/// Body of the outbound POST: `{"message": "<user text>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decoded response body, built only through [`ChatResponse::from_value`].
///
/// Both fields are kept as raw JSON because the server is free to send
/// anything; `reply_text` and `error_text` decide what counts as present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub reply: Option<Value>,
    pub error: Option<Value>,
}

impl ChatResponse {
    pub fn reply(text: &str) -> Self {
        Self {
            reply: Some(Value::String(text.to_string())),
            error: None,
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            reply: None,
            error: Some(Value::String(text.to_string())),
        }
    }

    /// Any JSON document is accepted; bodies that are not objects carry
    /// neither field.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                reply: map.remove("reply"),
                error: map.remove("error"),
            },
            _ => Self::default(),
        }
    }

    /// The reply, if it is a non-empty string.
    pub fn reply_text(&self) -> Option<&str> {
        match &self.reply {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// The backend error, if it holds anything truthy. Non-string values are
    /// shown as their JSON text.
    pub fn error_text(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_message_field() {
        let body = serde_json::to_value(ChatRequest::new("hello")).unwrap();
        assert_eq!(body, json!({"message": "hello"}));
    }

    #[test]
    fn test_non_object_body_has_no_fields() {
        assert_eq!(ChatResponse::from_value(json!([1, 2])), ChatResponse::default());
        assert_eq!(ChatResponse::from_value(json!("text")), ChatResponse::default());
        assert_eq!(ChatResponse::from_value(Value::Null), ChatResponse::default());
    }

    #[test]
    fn test_empty_or_non_string_reply_is_absent() {
        let empty = ChatResponse::from_value(json!({"reply": ""}));
        assert_eq!(empty.reply_text(), None);

        let number = ChatResponse::from_value(json!({"reply": 42}));
        assert_eq!(number.reply_text(), None);
    }

    #[test]
    fn test_error_text_truthiness() {
        let err = |v: Value| ChatResponse::from_value(json!({ "error": v })).error_text();
        assert_eq!(err(json!("bad input")), Some("bad input".to_string()));
        assert_eq!(err(json!("")), None);
        assert_eq!(err(json!(false)), None);
        assert_eq!(err(json!(0)), None);
        assert_eq!(err(json!(503)), Some("503".to_string()));
        assert_eq!(err(json!({"code": 1})), Some("{\"code\":1}".to_string()));
    }
}
