//! Destination path generation for downloaded pages.
//!
//! Each table gets one directory named `{table_name}_{table_id}`, holding
//! one file per page named `{table_name}_{table_id}_{page_index}.csv`.
//! Table names come from the API and may contain characters that are not
//! filesystem-safe; they are sanitized before use.

use std::path::{Path, PathBuf};

/// Replaces filesystem-reserved characters in a path component.
///
/// Separators, control characters, and reserved punctuation collapse into
/// single underscores; alphanumeric characters (including non-ASCII
/// letters, so Japanese table names survive) pass through.
#[must_use]
pub fn sanitize_component(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\'' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') => c,
            _ => '_',
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }
    out.trim_matches('_').to_string()
}

/// Directory for one table's pages: `{root}/{name}_{id}`.
#[must_use]
pub fn table_dir(root: &Path, name: &str, id: &str) -> PathBuf {
    root.join(format!("{}_{}", sanitize_component(name), sanitize_component(id)))
}

/// File name for one page: `{name}_{id}_{page_index}.csv`.
#[must_use]
pub fn page_file_name(name: &str, id: &str, page_index: usize) -> String {
    format!(
        "{}_{}_{page_index}.csv",
        sanitize_component(name),
        sanitize_component(id)
    )
}
