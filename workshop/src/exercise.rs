//! Pluggable exercise implementations.
//!
//! Each catalog entry owns a directory holding an `exercise.toml` entry file.
//! The entry file's `kind` names a constructor in the [`ExerciseRegistry`];
//! the constructed [`Exercise`] is initialized with the entry's identity and
//! then driven by the lifecycle controller. Hooks are blocking calls that
//! resolve exactly once.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::catalog::CatalogEntry;
use crate::core::types::{ExerciseText, Mode};
use crate::error::WorkshopError;

/// Well-known entry file inside every exercise directory.
pub const ENTRY_FILE: &str = "exercise.toml";

/// Identity handed to an exercise before any other hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseMeta {
    pub id: String,
    pub name: String,
    pub directory: PathBuf,
    pub number: usize,
}

impl From<&CatalogEntry> for ExerciseMeta {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            directory: entry.directory.clone(),
            number: entry.number,
        }
    }
}

/// Capability contract every exercise implementation provides.
pub trait Exercise {
    /// Establish identity. Called once, before any other hook.
    fn init(&mut self, meta: ExerciseMeta);

    /// Set up anything the learner needs (e.g. scaffold a template).
    fn prepare(&mut self) -> Result<()>;

    /// Instructions to display.
    fn exercise_text(&self) -> Result<ExerciseText>;

    /// Execute a submission without grading. The returned flag is informational.
    fn run(&mut self, args: &[String]) -> Result<bool>;

    /// Execute and grade a submission.
    fn verify(&mut self, args: &[String]) -> Result<bool>;

    /// Cleanup after a graded attempt; called exactly once per pass or fail.
    fn end(&mut self, mode: Mode, passed: bool) -> Result<()>;

    /// Reference solution files shown after a pass.
    fn solution_files(&self) -> Result<Vec<PathBuf>>;

    /// Suppress the solution reveal even on pass.
    fn hide_solutions(&self) -> bool {
        false
    }
}

/// Parsed `exercise.toml` handed to a constructor.
#[derive(Debug, Clone)]
pub struct EntryFile {
    pub path: PathBuf,
    pub kind: String,
    pub table: toml::Table,
}

impl EntryFile {
    /// Deserialize the entry table into a constructor-specific config type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        toml::Value::Table(self.table.clone())
            .try_into()
            .with_context(|| format!("parse {}", self.path.display()))
    }
}

/// Builds an uninitialized exercise from its entry file.
pub type ExerciseConstructor = Box<dyn Fn(&EntryFile) -> Result<Box<dyn Exercise>>>;

/// Kind name → constructor.
#[derive(Default)]
pub struct ExerciseRegistry {
    constructors: BTreeMap<String, ExerciseConstructor>,
}

impl ExerciseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the kinds shipped in [`crate::exercises`].
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::exercises::register_builtin(&mut registry);
        registry
    }

    /// Register `constructor` for `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: &str, constructor: F)
    where
        F: Fn(&EntryFile) -> Result<Box<dyn Exercise>> + 'static,
    {
        self.constructors
            .insert(kind.to_string(), Box::new(constructor));
    }

    /// Load, construct and initialize the exercise for `entry`.
    ///
    /// Every failure here is a configuration error for that exercise.
    pub fn load(&self, entry: &CatalogEntry) -> Result<Box<dyn Exercise>, WorkshopError> {
        let entry_file = read_entry_file(&entry.directory).map_err(WorkshopError::config)?;
        let constructor = self.constructors.get(&entry_file.kind).ok_or_else(|| {
            WorkshopError::config(anyhow!(
                "ERROR: {} is not a workshop exercise (unknown kind '{}')",
                entry_file.path.display(),
                entry_file.kind
            ))
        })?;
        let mut exercise = constructor(&entry_file).map_err(|err| {
            WorkshopError::config(err.context(format!(
                "ERROR: {} is not a workshop exercise",
                entry_file.path.display()
            )))
        })?;
        debug!(exercise = %entry.name, kind = %entry_file.kind, "exercise loaded");
        exercise.init(ExerciseMeta::from(entry));
        Ok(exercise)
    }
}

fn read_entry_file(directory: &Path) -> Result<EntryFile> {
    let path = directory.join(ENTRY_FILE);
    if !path.is_file() {
        return Err(anyhow!("ERROR: {} does not exist!", path.display()));
    }
    let contents = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let table: toml::Table = toml::from_str(&contents)
        .with_context(|| format!("ERROR: {} is not a workshop exercise", path.display()))?;
    let kind = table
        .get("kind")
        .and_then(|value| value.as_str())
        .ok_or_else(|| {
            anyhow!(
                "ERROR: {} is not a workshop exercise (missing string `kind`)",
                path.display()
            )
        })?
        .to_string();
    Ok(EntryFile { path, kind, table })
}
