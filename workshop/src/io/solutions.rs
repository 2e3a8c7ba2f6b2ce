//! Concurrent loading of reference solution files.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

/// A solution file ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFile {
    pub path: PathBuf,
    /// File name shown above the contents when several files are listed.
    pub name: String,
    pub contents: String,
}

/// Read every file concurrently; results keep the order of `paths`.
///
/// Fails on the first unreadable file in listed order.
pub fn read_solution_files(paths: &[PathBuf]) -> Result<Vec<SolutionFile>> {
    debug!(count = paths.len(), "reading solution files");
    thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| scope.spawn(move || read_solution_file(path)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("solution reader thread panicked"))?
            })
            .collect()
    })
}

fn read_solution_file(path: &Path) -> Result<SolutionFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read solution {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SolutionFile {
        path: path.to_path_buf(),
        name,
        contents,
    })
}
