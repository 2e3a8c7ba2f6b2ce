//! Stable exit codes for workshop CLI commands.

use crate::core::types::ExecuteOutcome;

/// Command succeeded, including a verified pass and a dry run.
pub const OK: i32 = 0;
/// Command failed with a configuration, usage, resolution or execution error.
pub const INVALID: i32 = 1;
/// `workshop verify` judged the submission incorrect.
pub const FAILED: i32 = 2;

/// Exit code for a finished `run` / `verify`.
pub fn for_outcome(outcome: ExecuteOutcome) -> i32 {
    match outcome {
        ExecuteOutcome::DryRun | ExecuteOutcome::Passed { .. } => OK,
        ExecuteOutcome::Failed => FAILED,
    }
}
