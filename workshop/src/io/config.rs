//! Workshop configuration stored in `workshop.toml` at the application root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Workshop configuration (TOML).
///
/// Every field is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkshopConfig {
    /// Application name. Names the progress directory and appears in hints.
    pub name: String,

    /// Heading shown above every exercise and the menu.
    pub title: String,

    pub subtitle: Option<String>,

    /// Directory holding `menu.json` and one directory per exercise.
    pub exercise_dir: PathBuf,

    /// Width of the menu rule.
    pub width: usize,

    pub help_file: Option<PathBuf>,
    pub credits_file: Option<PathBuf>,
    pub prerequisites_file: Option<PathBuf>,

    /// Overrides `$HOME/.config/<name>` for progress documents.
    pub data_dir: Option<PathBuf>,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            name: "workshop".to_string(),
            title: "WORKSHOP".to_string(),
            subtitle: None,
            exercise_dir: PathBuf::from("exercises"),
            width: 65,
            help_file: None,
            credits_file: None,
            prerequisites_file: None,
            data_dir: None,
        }
    }
}

impl WorkshopConfig {
    pub fn validate(&self) -> Result<()> {
        validate_app_name(&self.name)?;
        if self.title.trim().is_empty() {
            return Err(anyhow!("title must not be empty"));
        }
        if self.exercise_dir.as_os_str().is_empty() {
            return Err(anyhow!("exercise_dir must not be empty"));
        }
        if self.width == 0 {
            return Err(anyhow!("width must be > 0"));
        }
        Ok(())
    }
}

/// Validate that a name is safe to use as a single directory component.
pub fn validate_app_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("name must not be empty"));
    }
    if name
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
    {
        return Err(anyhow!("name must be [A-Za-z0-9._-] only (got '{name}')"));
    }
    if name.starts_with('.') {
        return Err(anyhow!("name must not start with '.' (got '{name}')"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `WorkshopConfig::default()`.
pub fn load_config(path: &Path) -> Result<WorkshopConfig> {
    if !path.exists() {
        let cfg = WorkshopConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WorkshopConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid {}", path.display()))?;
    Ok(cfg)
}
