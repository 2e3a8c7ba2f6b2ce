//! Ordered exercise catalog and name resolution.

use std::path::PathBuf;

use crate::core::slug::{dir_slug, id_from_name, match_key};

/// A resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display name exactly as listed in the menu.
    pub name: String,
    /// 1-based position in the menu.
    pub number: usize,
    /// Stable identifier derived from the name.
    pub id: String,
    /// Exercise directory (`<exercise_dir>/<slug>`).
    pub directory: PathBuf,
}

/// Fixed, ordered list of exercise names for one application.
///
/// Order and numbering never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    exercise_dir: PathBuf,
    names: Vec<String>,
}

impl Catalog {
    /// Build a catalog without validation (see `core::invariants`).
    pub fn new(exercise_dir: impl Into<PathBuf>, names: Vec<String>) -> Self {
        Self {
            exercise_dir: exercise_dir.into(),
            names,
        }
    }

    /// Resolve a name using a trimmed, case-insensitive exact match.
    pub fn resolve(&self, name: &str) -> Option<CatalogEntry> {
        let key = match_key(name);
        let index = self
            .names
            .iter()
            .position(|candidate| match_key(candidate) == key)?;
        Some(self.entry_at(index))
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate entries in menu order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        (0..self.names.len()).map(|index| self.entry_at(index))
    }

    fn entry_at(&self, index: usize) -> CatalogEntry {
        let name = &self.names[index];
        CatalogEntry {
            name: name.clone(),
            number: index + 1,
            id: id_from_name(name),
            directory: self.exercise_dir.join(dir_slug(name)),
        }
    }
}
