//! Helpers for turning user input into name and TLD lists.
//!
//! Names are not validated: whatever the caller provides is probed as-is,
//! apart from trimming and lower-casing.

use crate::error::DnCheckError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Whether a name is empty after trimming.
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// Normalize one name: trim surrounding whitespace and lower-case it.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Split a comma-separated list of names.
///
/// Entries are normalized but blanks are kept; the scheduler drops them.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',').map(normalize_name).collect()
}

/// Split a comma-separated TLD list, dropping blank entries and leading dots.
pub fn split_tlds(list: &str) -> Vec<String> {
    list.split(',')
        .map(|tld| tld.trim().trim_start_matches('.').to_lowercase())
        .filter(|tld| !tld.is_empty())
        .collect()
}

/// Read names from a file, one per line.
///
/// Lines are normalized; blank lines are kept as empty entries and lines
/// starting with `#` are treated as comments.
pub fn read_names_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DnCheckError> {
    let path = path.as_ref();
    let shown = path.to_string_lossy();

    let file = File::open(path)
        .map_err(|e| DnCheckError::file_error(shown.clone(), format!("cannot open: {}", e)))?;

    let mut names = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            DnCheckError::file_error(
                shown.clone(),
                format!("line {}: read failed: {}", line_num + 1, e),
            )
        })?;
        if line.trim_start().starts_with('#') {
            continue;
        }
        names.push(normalize_name(&line));
    }

    tracing::debug!(path = %shown, count = names.len(), "read names file");
    Ok(names)
}
