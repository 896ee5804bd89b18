//! Turning a finished request into the text shown in the placeholder.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ClientError;
use crate::locale::Locale;
use crate::protocol::ChatResponse;

fn reasoning_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("static regex"))
}

/// Remove every `<think>...</think>` span (tags included) and trim the rest.
pub fn strip_reasoning(text: &str) -> String {
    reasoning_span().replace_all(text, "").trim().to_string()
}

/// Outcome of one request, in the order the widget checks for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Reply text with reasoning spans already removed.
    Reply(String),
    /// The server answered with an `error` field.
    BackendError(String),
    /// Neither `reply` nor `error` was usable.
    UnknownFormat,
    /// Transport failure, non-success status, bad body or a crashed task.
    Failed(String),
}

impl Completion {
    pub fn from_response(response: &ChatResponse) -> Self {
        if let Some(reply) = response.reply_text() {
            Completion::Reply(strip_reasoning(reply))
        } else if let Some(error) = response.error_text() {
            Completion::BackendError(error)
        } else {
            Completion::UnknownFormat
        }
    }

    pub fn from_result(result: Result<ChatResponse, ClientError>) -> Self {
        match result {
            Ok(response) => Self::from_response(&response),
            Err(e) => Completion::Failed(e.to_string()),
        }
    }

    /// True for every outcome that is not a real reply.
    pub fn is_error(&self) -> bool {
        !matches!(self, Completion::Reply(_))
    }

    /// Markdown source for the placeholder.
    pub fn render(&self, locale: Locale) -> String {
        match self {
            Completion::Reply(text) => text.clone(),
            Completion::BackendError(error) => {
                format!("{}: {}", locale.backend_error_label(), error)
            }
            Completion::UnknownFormat => locale.unknown_format().to_string(),
            Completion::Failed(message) => {
                format!("{}: {}", locale.request_failed_label(), message)
            }
        }
    }
}
