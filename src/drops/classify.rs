//! # Error Classifier
//!
//! Turns a raw [`ServiceError`] into a user-facing [`ClassifiedError`]. The
//! remote service reports failures in several loose shapes; the classifier picks
//! the most specific one available, in this order:
//!
//! 1. Validation list: `[{"field": "title", "messages": ["..."]}]`, one line per message
//! 2. Validation map: `{"title": "..."}` or `{"title": ["...", "..."]}`, one line per field
//! 3. A single human-readable message
//! 4. HTTP status and status text
//! 5. Whatever text the error carried
//!
//! Classification is pure and never performs I/O. A [`ClassifiedError`] passed back
//! in comes out untouched, so classifying twice never stacks `failed:` prefixes.

use crate::service::ServiceError;
use serde_json::Value;
use std::fmt;

/// A service error rendered for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub operation: String,
    pub message: String,
    pub status: Option<u16>,
}

impl ClassifiedError {
    /// 401 responses, or messages that mention it, get a login hint.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
            || self.message.contains("Unauthorized")
            || self
                .message
                .split(|c: char| !c.is_ascii_alphanumeric())
                .any(|word| word == "401")
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClassifiedError {}

/// Either side of the service-call boundary.
#[derive(Debug, Clone)]
pub enum ServiceFailure {
    Raw(ServiceError),
    Classified(ClassifiedError),
}

impl From<ServiceError> for ServiceFailure {
    fn from(error: ServiceError) -> Self {
        ServiceFailure::Raw(error)
    }
}

impl From<ClassifiedError> for ServiceFailure {
    fn from(error: ClassifiedError) -> Self {
        ServiceFailure::Classified(error)
    }
}

pub fn classify(failure: impl Into<ServiceFailure>, operation: &str) -> ClassifiedError {
    let raw = match failure.into() {
        ServiceFailure::Classified(classified) => return classified,
        ServiceFailure::Raw(raw) => raw,
    };

    let prefix = format!("{} failed:", operation);
    let message = if let Some(lines) = raw.details.as_ref().and_then(validation_lines) {
        format!("{}\n{}", prefix, lines.join("\n"))
    } else if let Some(text) = raw.message.as_deref().filter(|m| !m.trim().is_empty()) {
        format!("{} {}", prefix, text)
    } else if let Some(status) = raw.status {
        let status_text = raw.status_text.as_deref().unwrap_or_default();
        format!("{} {} {}", prefix, status, status_text)
            .trim_end()
            .to_string()
    } else {
        format!("{} {}", prefix, raw)
    };

    ClassifiedError {
        operation: operation.to_string(),
        message,
        status: raw.status,
    }
}

fn validation_lines(details: &Value) -> Option<Vec<String>> {
    let lines: Vec<String> = match details {
        Value::Array(entries) => entries.iter().flat_map(list_entry_lines).collect(),
        Value::Object(fields) => fields
            .iter()
            .filter_map(|(field, messages)| {
                let messages = message_texts(messages);
                if messages.is_empty() {
                    None
                } else {
                    Some(format!("{}: {}", field, messages.join(", ")))
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

fn list_entry_lines(entry: &Value) -> Vec<String> {
    let Some(field) = entry.get("field").and_then(Value::as_str) else {
        return Vec::new();
    };
    let messages = entry
        .get("messages")
        .or_else(|| entry.get("message"))
        .map(message_texts)
        .unwrap_or_default();
    messages
        .iter()
        .map(|message| format!("{}: {}", field, strip_quoted_prefix(message)))
        .collect()
}

fn message_texts(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Drops a leading `"token"` echo, e.g. `"title" must not be empty` -> `must not be empty`.
fn strip_quoted_prefix(message: &str) -> &str {
    let trimmed = message.trim_start();
    let Some(rest) = trimmed.strip_prefix('"') else {
        return message;
    };
    let Some(end) = rest.find('"') else {
        return message;
    };
    let after = &rest[end + 1..];
    if !after.starts_with(char::is_whitespace) {
        return message;
    }
    let stripped = after.trim_start();
    if stripped.is_empty() {
        message
    } else {
        stripped
    }
}
