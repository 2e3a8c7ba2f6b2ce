//! Catalog loading from `<exercise_dir>/menu.json` with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::catalog::Catalog;
use crate::core::invariants::validate_catalog_names;

const MENU_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/menu.schema.json"
));

/// Load and validate the menu, producing a catalog rooted at `exercise_dir`.
pub fn load_catalog(menu_path: &Path, exercise_dir: &Path) -> Result<Catalog> {
    if !exercise_dir.is_dir() {
        return Err(anyhow!(
            "exercise directory {} does not exist or is not a directory",
            exercise_dir.display()
        ));
    }
    let contents = fs::read_to_string(menu_path)
        .with_context(|| format!("read menu {}", menu_path.display()))?;
    let menu: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse menu {}", menu_path.display()))?;
    validate_schema(&menu).with_context(|| format!("malformed menu {}", menu_path.display()))?;
    let names: Vec<String> = serde_json::from_value(menu)
        .with_context(|| format!("deserialize menu {}", menu_path.display()))?;

    let errors = validate_catalog_names(&names);
    if !errors.is_empty() {
        return Err(anyhow!(
            "malformed menu {}: {}",
            menu_path.display(),
            errors.join("; ")
        ));
    }
    debug!(count = names.len(), "catalog loaded");
    Ok(Catalog::new(exercise_dir, names))
}

fn validate_schema(menu: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(MENU_SCHEMA).context("parse menu schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(menu) {
        let messages = compiled
            .iter_errors(menu)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "menu schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
