//! # Remote Drop Service
//!
//! The drop service is an external collaborator. This module defines the
//! [`DropService`] trait the rest of the crate talks to, so commands never know
//! whether they are speaking HTTP or exercising an in-memory fake.
//!
//! ## Implementations
//!
//! - [`http::HttpDropService`]: production client over `reqwest::blocking`
//! - [`memory::InMemoryService`]: in-memory fake for tests, with failure
//!   injection and call counters
//!
//! ## Errors
//!
//! Every method returns [`ServiceError`], a loose record of what
//! the service said. Classification into user-facing text happens once, at the
//! command layer, via [`crate::classify::classify`].

use crate::model::{Board, DropResult, DropUpdate, NewDrop, UpdatedDrop};
use serde_json::Value;
use std::fmt;

pub mod http;
#[cfg(any(test, feature = "test_utils"))]
pub mod memory;

/// Raw failure reported by the remote service or its transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceError {
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub message: Option<String>,
    /// Field-level validation payload, as a list or a map. Shape owned by the service.
    pub details: Option<Value>,
    /// Unparsed response body, kept when nothing else is available.
    pub body: Option<String>,
}

impl ServiceError {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            status_text: Some(status_text.into()),
            ..Default::default()
        }
    }

    pub fn validation(details: Value) -> Self {
        Self {
            status: Some(422),
            status_text: Some("Unprocessable Entity".to_string()),
            details: Some(details),
            ..Default::default()
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            return f.write_str(message);
        }
        if let Some(body) = self.body.as_deref().filter(|b| !b.trim().is_empty()) {
            return f.write_str(body.trim());
        }
        if let Some(status) = self.status {
            return write!(
                f,
                "{} {}",
                status,
                self.status_text.as_deref().unwrap_or_default()
            );
        }
        f.write_str("unknown error")
    }
}

impl std::error::Error for ServiceError {}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Operations the remote service exposes over drops and boards.
pub trait DropService {
    /// Create a drop. The service always creates drops as public.
    fn create_drop(&mut self, payload: &NewDrop) -> ServiceResult<DropResult>;

    /// Apply a partial update to an existing drop. A 2xx answer is success
    /// whatever its body holds.
    fn update_drop(&mut self, code: &str, update: &DropUpdate) -> ServiceResult<UpdatedDrop>;

    /// Delete a drop permanently
    fn delete_drop(&mut self, code: &str) -> ServiceResult<()>;

    /// List the caller's drops
    fn list_drops(&self) -> ServiceResult<Vec<DropResult>>;

    /// List the caller's boards
    fn list_boards(&self) -> ServiceResult<Vec<Board>>;

    /// Fetch a single board by id
    fn get_board(&self, id: &str) -> ServiceResult<Board>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefers_message() {
        let error = ServiceError {
            status: Some(500),
            message: Some("boom".to_string()),
            body: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_display_status() {
        assert_eq!(
            ServiceError::status(404, "Not Found").to_string(),
            "404 Not Found"
        );
        assert_eq!(ServiceError::default().to_string(), "unknown error");
    }
}
