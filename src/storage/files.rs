//! Data directory layout
//!
//! Tables live under one configured directory as `<name>.CSV` (suffix
//! matched case-insensitively), optionally with a sibling `<name>.RUL` rule
//! file and a `commands.tag` tag list.

use super::csv;
use crate::error::Result;
use crate::types::Table;
use std::path::{Path, PathBuf};

/// The tag list file name.
const TAGS_FILE: &str = "commands.tag";

/// Strips a case-insensitive `.csv` suffix from a table name, if present.
pub fn strip_csv_suffix(name: &str) -> &str {
    match name.char_indices().rev().nth(3) {
        Some((idx, _)) if name[idx..].eq_ignore_ascii_case(".csv") => &name[..idx],
        _ => name,
    }
}

/// The on-disk path a table saves to.
pub fn table_path(dir: &Path, table_name: &str) -> PathBuf {
    dir.join(format!("{}.CSV", table_name))
}

/// Loads every `*.csv` file in the directory, sorted by file name so the
/// registry order is deterministic.
pub fn load_dir(dir: &Path) -> Result<Vec<Table>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();

    let mut tables = Vec::with_capacity(files.len());
    for path in files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let name = strip_csv_suffix(&file_name).to_string();
        let content = std::fs::read_to_string(&path)?;
        let mut table = csv::parse(&name, &content)?;
        table.source_file = Some(file_name);
        tracing::debug!(
            table = %table.name,
            rows = table.rows.len(),
            "loaded table from {}",
            path.display()
        );
        tables.push(table);
    }
    Ok(tables)
}

/// Writes a table to its `<name>.CSV` file, returning the file name.
pub fn save_table(dir: &Path, table: &Table) -> Result<String> {
    let path = table_path(dir, &table.name);
    std::fs::write(&path, csv::serialize(table))?;
    tracing::debug!(table = %table.name, rows = table.rows.len(), "saved table to {}", path.display());
    Ok(format!("{}.CSV", table.name))
}

/// Locates the table's rule file, trying `.rul` then `.RUL`.
pub fn rule_file(dir: &Path, table_name: &str) -> Option<PathBuf> {
    for ext in ["rul", "RUL"] {
        let path = dir.join(format!("{}.{}", table_name, ext));
        if path.is_file() {
            return Some(path);
        }
    }
    None
}

/// Reads the tag list, one tag per line; a missing file is an empty list.
pub fn read_tags(dir: &Path) -> Result<Vec<String>> {
    let path = dir.join(TAGS_FILE);
    if !path.is_file() {
        return Ok(Vec::new());
    }
    Ok(std::fs::read_to_string(&path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_csv_suffix() {
        assert_eq!(strip_csv_suffix("sales.csv"), "sales");
        assert_eq!(strip_csv_suffix("sales.CSV"), "sales");
        assert_eq!(strip_csv_suffix("sales.Csv"), "sales");
        assert_eq!(strip_csv_suffix("sales"), "sales");
        assert_eq!(strip_csv_suffix("csv"), "csv");
        assert_eq!(strip_csv_suffix(".csv"), "");
        assert_eq!(strip_csv_suffix("archive.csv.csv"), "archive.csv");
    }
}
