//! Rendering of user-facing text files through minijinja.
//!
//! Instructions, help, credits and prerequisites may reference `{{ appname }}`
//! and `{{ rootdir }}`; everything else passes through unchanged.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use minijinja::{Environment, context};

/// Values available to rendered text.
#[derive(Debug, Clone)]
pub struct TextVars {
    pub appname: String,
    pub rootdir: String,
}

impl TextVars {
    pub fn new(appname: &str, rootdir: &Path) -> Self {
        Self {
            appname: appname.to_string(),
            rootdir: rootdir.display().to_string(),
        }
    }
}

/// Render `source` with the workshop variables.
pub fn render_text(source: &str, vars: &TextVars) -> Result<String> {
    let env = Environment::new();
    let rendered = env
        .render_str(
            source,
            context! {
                appname => vars.appname.as_str(),
                rootdir => vars.rootdir.as_str(),
            },
        )
        .context("render text")?;
    Ok(rendered)
}

/// Read and render a text file.
pub fn render_file(path: &Path, vars: &TextVars) -> Result<String> {
    let source = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    render_text(&source, vars).with_context(|| format!("render {}", path.display()))
}
