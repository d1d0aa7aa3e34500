//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for drop operations, whichever UI drives them.
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs**: fills configured defaults (privacy, board) into
//!   per-command options the user left unset
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic, no I/O of its own and no presentation.
//!
//! ## Generic Over DropService
//!
//! `DropsApi<S: DropService>` is generic over the remote backend:
//! - Production: `DropsApi<HttpDropService>`
//! - Testing: `DropsApi<InMemoryService>`

use crate::commands::{self, CmdResult, CreateOptions};
use crate::config::DropsConfig;
use crate::error::Result;
use crate::model::Privacy;
use crate::service::DropService;
use std::path::Path;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::note::{NoteRequest, NoteSource};
pub use crate::commands::{CmdMessage, MessageLevel};

/// Defaults applied to new drops when a command does not say otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropDefaults {
    pub privacy: Privacy,
    pub board: Option<String>,
}

impl From<&DropsConfig> for DropDefaults {
    fn from(config: &DropsConfig) -> Self {
        Self {
            privacy: config.privacy,
            board: config.board.clone(),
        }
    }
}

pub struct DropsApi<S: DropService> {
    service: S,
    defaults: DropDefaults,
}

impl<S: DropService> DropsApi<S> {
    pub fn new(service: S, defaults: DropDefaults) -> Self {
        Self { service, defaults }
    }

    pub fn upload_file(&mut self, path: &Path, options: CreateOptions) -> Result<CmdResult> {
        let options = self.with_defaults(options);
        commands::upload::run(&mut self.service, path, options)
    }

    pub fn shorten_link(&mut self, url: &str, options: CreateOptions) -> Result<CmdResult> {
        let options = self.with_defaults(options);
        commands::link::run(&mut self.service, url, options)
    }

    pub fn create_note(&mut self, request: NoteRequest, options: CreateOptions) -> Result<CmdResult> {
        let options = self.with_defaults(options);
        commands::note::run(&mut self.service, request, options)
    }

    pub fn list_drops(&self) -> Result<CmdResult> {
        commands::list::run(&self.service)
    }

    pub fn delete_drop(&mut self, code: &str) -> Result<CmdResult> {
        commands::delete::run(&mut self.service, code)
    }

    pub fn boards(&self, id: Option<&str>) -> Result<CmdResult> {
        commands::boards::run(&self.service, id)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn with_defaults(&self, mut options: CreateOptions) -> CreateOptions {
        if options.privacy.is_none() {
            options.privacy = Some(self.defaults.privacy);
        }
        if options.board.is_none() {
            options.board = self.defaults.board.clone();
        }
        options
    }
}
