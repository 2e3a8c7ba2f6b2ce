//! User-facing error taxonomy for workshop commands.
//!
//! Every variant is terminal for the current invocation and maps to
//! [`crate::exit_codes::INVALID`]. A graded failure is not an error; see
//! [`crate::core::types::ExecuteOutcome::Failed`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkshopError {
    /// Missing or invalid exercise layout, entry file or catalog.
    #[error("{0:#}")]
    Config(anyhow::Error),

    /// Command invoked without the state or arguments it needs.
    #[error("{0}")]
    Usage(String),

    /// Name did not match any catalog entry.
    #[error("No such exercise: {0}")]
    Resolution(String),

    /// An exercise hook reported a tooling problem.
    #[error("{action}: {cause:#}")]
    Execution {
        action: String,
        cause: anyhow::Error,
    },
}

impl WorkshopError {
    pub fn config(err: impl Into<anyhow::Error>) -> Self {
        Self::Config(err.into())
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn execution(action: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::Execution {
            action: action.into(),
            cause,
        }
    }

    pub fn no_active_exercise() -> Self {
        Self::usage("No active exercise. Select one from the menu.")
    }
}
