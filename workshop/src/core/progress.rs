//! Pure progress transforms applied through the progress store.

/// Append `name` to `completed` unless it is already present.
///
/// Order is completion order; re-applying with the same name is a no-op.
pub fn with_completed(mut completed: Vec<String>, name: &str) -> Vec<String> {
    if !completed.iter().any(|done| done == name) {
        completed.push(name.to_string());
    }
    completed
}

/// Number of exercises left given the catalog size and completed count.
pub fn remaining(total: usize, completed: usize) -> usize {
    total.saturating_sub(completed)
}
