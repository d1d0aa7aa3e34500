use crate::classify::ClassifiedError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What happened to a drop after its corrective update failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Privacy was not requested, so the public drop was left in place.
    NotAttempted,
    /// The drop was deleted.
    Deleted,
    /// The delete call itself failed; the drop may still be reachable.
    Failed(String),
}

impl fmt::Display for CleanupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupOutcome::NotAttempted => write!(f, "drop left in place"),
            CleanupOutcome::Deleted => write!(f, "drop deleted"),
            CleanupOutcome::Failed(reason) => write!(f, "cleanup delete failed: {}", reason),
        }
    }
}

#[derive(Error, Debug)]
pub enum DropsError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid URL: {0} (only http and https links can be shortened)")]
    InvalidUrl(String),

    #[error("Note content cannot be empty")]
    EmptyContent,

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Not logged in. Run `drops login` first")]
    MissingAuthentication,

    #[error("{0}")]
    Service(ClassifiedError),

    // Only the update error is shown; the cleanup outcome is for diagnostics.
    #[error("{error}")]
    Reconciliation {
        error: ClassifiedError,
        cleanup: CleanupOutcome,
    },

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DropsError {
    /// The classified service error behind this failure, if any.
    pub fn service_error(&self) -> Option<&ClassifiedError> {
        match self {
            DropsError::Service(error) | DropsError::Reconciliation { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Precondition errors are detected locally, before any network call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DropsError::FileNotFound(_)
                | DropsError::InvalidUrl(_)
                | DropsError::EmptyContent
                | DropsError::BoardNotFound(_)
                | DropsError::MissingAuthentication
        )
    }
}

impl From<ClassifiedError> for DropsError {
    fn from(error: ClassifiedError) -> Self {
        DropsError::Service(error)
    }
}

pub type Result<T> = std::result::Result<T, DropsError>;
