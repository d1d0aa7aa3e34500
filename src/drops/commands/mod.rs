//! # Command Layer
//!
//! Each command lives in its own submodule and implements the logic for one
//! operation against a [`DropService`](crate::service::DropService).
//!
//! Commands:
//! - validate their preconditions locally before any network call
//! - classify service errors exactly once, at the call site
//! - return a structured [`CmdResult`], never strings
//! - never print, prompt, or exit
//!
//! The three creators ([`upload`], [`link`], [`note`]) only build the
//! type-specific payload. Privacy, password and title are enforced by
//! [`crate::reconcile`], never by talking to update/delete directly.
//!
//! ## Testing Strategy
//!
//! Command tests run against `InMemoryService`, which counts calls and can be
//! told to fail, so every branch is reachable without a network.
//!
//! ## Command Modules
//!
//! - [`upload`]: Upload a local file
//! - [`link`]: Shorten a URL
//! - [`note`]: Create a text or code note
//! - [`list`]: List drops
//! - [`delete`]: Delete a drop
//! - [`boards`]: List or show boards
//! - [`auth`]: Store, clear and inspect credentials
//! - [`config`]: Manage configuration
//! - [`helpers`]: Board resolution and the shared create path

use crate::config::DropsConfig;
use crate::model::{Board, DropResult, Privacy};
use serde::Serialize;

pub mod auth;
pub mod boards;
pub mod config;
pub mod delete;
pub mod helpers;
pub mod link;
pub mod list;
pub mod note;
pub mod upload;

/// Options shared by every drop creator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub title: Option<String>,
    /// Unset means the configured default.
    pub privacy: Option<Privacy>,
    pub password: Option<String>,
    /// Board name or id.
    pub board: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Structured output of a command. The UI decides how to render it.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub drops: Vec<DropResult>,
    pub boards: Vec<Board>,
    pub config: Option<DropsConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_drop(mut self, drop: DropResult) -> Self {
        self.drops.push(drop);
        self
    }
}
