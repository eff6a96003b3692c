//! Whole-table commands: save, copy, rename, delete, sort, and splice.

use super::CommandOutput;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::storage::files;
use crate::types::{Table, evaluator};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

/// Writes a table to `<data>/<name>.CSV` and records it as the table's
/// source file.
pub fn save_table(
    registry: &mut Registry,
    table_name: &str,
    data_dir: &Path,
) -> Result<CommandOutput> {
    let table = registry.require_mut(table_name)?;
    let file = files::save_table(data_dir, table)?;
    table.source_file = Some(file);
    Ok(CommandOutput::table(table.clone()))
}

/// Deep-copies a table under a new name. The copy is not file-backed until
/// it is saved.
pub fn copy_table(
    registry: &mut Registry,
    table_name: &str,
    new_name: &str,
) -> Result<CommandOutput> {
    if registry.contains(new_name) {
        return Err(Error::DuplicateTable(new_name.into()));
    }
    let mut copy = registry.require(table_name)?.clone();
    copy.name = new_name.to_string();
    copy.source_file = None;
    registry.insert(copy.clone())?;
    Ok(CommandOutput::created(copy))
}

pub fn rename_table(
    registry: &mut Registry,
    table_name: &str,
    new_name: &str,
) -> Result<CommandOutput> {
    registry.rename(table_name, new_name)?;
    let table = registry.require(new_name)?.clone();
    Ok(CommandOutput {
        table: Some(table),
        new_name: Some(new_name.to_string()),
    })
}

/// Removes the table from the registry; any on-disk file is untouched.
pub fn delete_table(registry: &mut Registry, table_name: &str) -> Result<CommandOutput> {
    registry.remove(table_name)?;
    Ok(CommandOutput::empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ASC", alias = "Asc")]
    Asc,
    #[serde(alias = "DESC", alias = "Desc")]
    Desc,
}

/// Stable sort by one column: numeric columns by value, TEXT by Unicode
/// codepoint order. Rows whose cells cannot be compared (mixed stray types)
/// keep their relative order.
pub fn sort_table(
    registry: &mut Registry,
    table_name: &str,
    column_name: &str,
    order: SortOrder,
) -> Result<CommandOutput> {
    let table = registry.require_mut(table_name)?;
    let idx = table
        .column_index(column_name)
        .ok_or_else(|| Error::ColumnNotFound(column_name.into()))?;

    table.rows.sort_by(|a, b| {
        let ord = evaluator::compare(&a[idx], &b[idx]).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    Ok(CommandOutput::table(table.clone()))
}

/// Concatenates tables with identical schemas into a new table.
pub fn splice_tables(
    registry: &mut Registry,
    new_name: &str,
    selected: &[&str],
) -> Result<CommandOutput> {
    if selected.is_empty() {
        return Err(Error::InvalidParameter("no tables selected".into()));
    }
    if registry.contains(new_name) {
        return Err(Error::DuplicateTable(new_name.into()));
    }

    let first = registry.require(selected[0])?;
    for name in &selected[1..] {
        let table = registry.require(name)?;
        if table.columns != first.columns {
            return Err(Error::TypeMismatch {
                expected: format!("the schema of '{}'", first.name),
                found: format!("a different schema in '{}'", table.name),
            });
        }
    }

    let mut spliced = Table::new(new_name, first.columns.clone())?;
    for name in selected {
        spliced
            .rows
            .extend(registry.require(name)?.rows.iter().cloned());
    }
    registry.insert(spliced.clone())?;
    Ok(CommandOutput::created(spliced))
}
