//! Canonical filesystem locations for one workshop application.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::io::config::WorkshopConfig;

pub const CONFIG_FILE: &str = "workshop.toml";
pub const MENU_FILE: &str = "menu.json";

/// All resolved paths for an application root.
///
/// Relative paths from the config resolve against `root`.
#[derive(Debug, Clone)]
pub struct WorkshopPaths {
    pub root: PathBuf,
    pub exercise_dir: PathBuf,
    pub menu_path: PathBuf,
    /// Directory holding one `<key>.json` progress document per key.
    pub data_dir: PathBuf,
    pub help_path: Option<PathBuf>,
    pub credits_path: Option<PathBuf>,
    pub prerequisites_path: Option<PathBuf>,
}

impl WorkshopPaths {
    /// Resolve paths for `root`. `data_dir` wins over the config when given.
    pub fn resolve(root: &Path, cfg: &WorkshopConfig, data_dir: Option<&Path>) -> Result<Self> {
        let exercise_dir = root.join(&cfg.exercise_dir);
        let data_dir = match (data_dir, &cfg.data_dir) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => root.join(dir),
            (None, None) => default_data_dir(&cfg.name)?,
        };
        Ok(Self {
            root: root.to_path_buf(),
            menu_path: exercise_dir.join(MENU_FILE),
            exercise_dir,
            data_dir,
            help_path: cfg.help_file.as_ref().map(|path| root.join(path)),
            credits_path: cfg.credits_file.as_ref().map(|path| root.join(path)),
            prerequisites_path: cfg.prerequisites_file.as_ref().map(|path| root.join(path)),
        })
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }
}

/// `$HOME/.config/<name>`, independent of platform conventions.
fn default_data_dir(name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(home.join(".config").join(name))
}
