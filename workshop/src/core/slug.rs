//! Deterministic name → slug mappings for catalog entries.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").unwrap());
static NON_DIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z_]").unwrap());
static NON_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]").unwrap());

/// Directory name for an exercise: lowercase, whitespace → `_`, only `[a-z_]` kept.
pub fn dir_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let underscored = WHITESPACE_RE.replace_all(&lowered, "_");
    NON_DIR_RE.replace_all(&underscored, "").into_owned()
}

/// Stable identifier for an exercise: whitespace → `-`, only `[A-Za-z0-9_-]` kept, lowercase.
pub fn id_from_name(name: &str) -> String {
    let dashed = WHITESPACE_RE.replace_all(name, "-");
    NON_ID_RE.replace_all(&dashed, "").to_lowercase()
}

/// Key used for case-insensitive, whitespace-trimmed name matching.
pub fn match_key(name: &str) -> String {
    name.trim().to_lowercase()
}
