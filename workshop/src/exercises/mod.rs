//! Exercise kinds shipped with the workshop.

pub mod output;

use crate::exercise::{Exercise, ExerciseRegistry};

/// Register every built-in kind.
pub fn register_builtin(registry: &mut ExerciseRegistry) {
    registry.register(output::KIND, |entry| {
        Ok(Box::new(output::OutputExercise::from_entry(entry)?) as Box<dyn Exercise>)
    });
}
