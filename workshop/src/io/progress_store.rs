//! Durable progress documents (`<data_dir>/<key>.json`).
//!
//! Reads fail soft: a missing, unreadable or unparseable document is treated
//! as absent so that corrupt state never blocks the user. Writes are
//! full-document read-modify-write with an atomic replace.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::core::progress::with_completed;

/// Name of the last selected exercise (JSON string).
pub const CURRENT: &str = "current";
/// Completed exercise names in completion order (JSON array of strings).
pub const COMPLETED: &str = "completed";

/// Key → JSON document storage.
pub trait ProgressStore {
    /// Read a document; `None` when it is absent or cannot be parsed.
    fn read(&self, key: &str) -> Option<Value>;

    /// Replace a document with `update(current)`. The only mutation path.
    fn write(&mut self, key: &str, update: &mut dyn FnMut(Option<Value>) -> Value) -> Result<()>;
}

/// Typed access to the `current` and `completed` documents.
pub trait Progress: ProgressStore {
    fn current(&self) -> Option<String> {
        self.read(CURRENT)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    fn completed(&self) -> Vec<String> {
        self.read(COMPLETED)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    fn set_current(&mut self, name: &str) -> Result<()> {
        self.write(CURRENT, &mut |_| Value::String(name.to_string()))
    }

    /// Idempotently record `name` as completed and return the stored list.
    fn mark_completed(&mut self, name: &str) -> Result<Vec<String>> {
        self.write(COMPLETED, &mut |prev| {
            let completed: Vec<String> = prev
                .and_then(|value| serde_json::from_value(value).ok())
                .unwrap_or_default();
            Value::from(with_completed(completed, name))
        })?;
        Ok(self.completed())
    }
}

impl<S: ProgressStore + ?Sized> Progress for S {}

/// File-backed store: one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ProgressStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<Value> {
        let path = self.document_path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!(path = %path.display(), err = %err, "progress document unreadable, treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(path = %path.display(), err = %err, "progress document corrupt, treating as absent");
                None
            }
        }
    }

    fn write(&mut self, key: &str, update: &mut dyn FnMut(Option<Value>) -> Value) -> Result<()> {
        let path = self.document_path(key);
        let next = update(self.read(key));
        debug!(path = %path.display(), "writing progress document");
        let mut buf = serde_json::to_string_pretty(&next).context("serialize progress document")?;
        buf.push('\n');
        write_atomic(&path, &buf)
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("progress path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp progress {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace progress {}", path.display()))?;
    Ok(())
}
