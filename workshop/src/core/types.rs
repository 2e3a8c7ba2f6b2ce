//! Shared deterministic types for the exercise lifecycle.
//!
//! These types define stable contracts between the controller and exercise
//! implementations. They must not depend on external state or I/O.

use std::fmt;

/// Execution mode for a submitted program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Dry-run: execute without grading or progress effects.
    Run,
    /// Execute and grade; progress is recorded on pass.
    Verify,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Run => "run",
            Mode::Verify => "verify",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How exercise instructions should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    Text,
}

/// Instructions produced by an exercise for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseText {
    pub content_type: ContentType,
    pub text: String,
}

/// Result of a `run` or `verify` command as seen by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// `run` finished; nothing was graded or recorded.
    DryRun,
    /// `verify` judged the submission incorrect.
    Failed,
    /// `verify` judged the submission correct.
    Passed {
        /// Exercises left after recording this pass (`0` means all finished).
        remaining: usize,
    },
}

impl ExecuteOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, ExecuteOutcome::Failed)
    }
}
