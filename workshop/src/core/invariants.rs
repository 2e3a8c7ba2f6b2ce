//! Catalog invariants not expressible via JSON Schema.

use std::collections::HashMap;

use crate::core::slug::{dir_slug, match_key};

/// Check semantic invariants of an exercise menu:
/// - At least one exercise
/// - No name that is blank after trimming
/// - No duplicate names (case-insensitive, trimmed)
/// - Every name maps to a non-empty, unique directory slug
pub fn validate_catalog_names(names: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    if names.is_empty() {
        errors.push("menu must list at least one exercise".to_string());
    }

    let mut seen_keys: HashMap<String, usize> = HashMap::new();
    let mut seen_slugs: HashMap<String, usize> = HashMap::new();
    for (index, name) in names.iter().enumerate() {
        let number = index + 1;
        let key = match_key(name);
        if key.is_empty() {
            errors.push(format!("#{number}: exercise name must not be blank"));
            continue;
        }
        if let Some(first) = seen_keys.insert(key, number) {
            errors.push(format!(
                "#{number}: duplicate exercise name '{name}' (first at #{first})"
            ));
        }

        let slug = dir_slug(name);
        if slug.trim_matches('_').is_empty() {
            errors.push(format!("#{number}: '{name}' has no usable directory name"));
            continue;
        }
        if let Some(first) = seen_slugs.insert(slug.clone(), number) {
            errors.push(format!(
                "#{number}: '{name}' maps to directory '{slug}' already used by #{first}"
            ));
        }
    }
    errors
}
