//! Interactive learning-exercise runner.
//!
//! A workshop presents an ordered catalog of exercises, remembers which one is
//! selected and which ones are completed, and drives each exercise through
//! its lifecycle: show instructions, run or verify a submitted program,
//! record a pass and reveal the reference solution.
//!
//! - **[`core`]**: Pure logic (catalog resolution, slugs, progress transforms).
//! - **[`io`]**: Side effects (config, progress documents, catalog loading,
//!   child processes, text rendering).
//! - **[`exercise`]** / **[`exercises`]**: The pluggable exercise contract, its
//!   registry and the built-in kinds.
//! - **[`workshop`]**: The lifecycle controller used by the CLI verbs.

pub mod core;
pub mod error;
pub mod exercise;
pub mod exercises;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod present;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod workshop;
