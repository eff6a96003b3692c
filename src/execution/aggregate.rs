//! COLLAPSE_TABLE and GROUP_TABLE commands
//!
//! Both commands fold rows that share a grouping value into one row of
//! sums, emitting groups in first-appearance order. COLLAPSE keeps every
//! numeric column (and can fold the whole table into a single row when no
//! group column is given); GROUP keeps exactly the requested columns.

use super::CommandOutput;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::types::{DataType, Table, Value};
use std::collections::HashMap;

pub fn collapse_table(
    registry: &mut Registry,
    table_name: &str,
    column_name: Option<&str>,
    new_name: &str,
) -> Result<CommandOutput> {
    let table = registry.require(table_name)?;
    if let Some(group) = column_name {
        let (_, column) = table
            .get_column(group)
            .ok_or_else(|| Error::ColumnNotFound(group.into()))?;
        if column.data_type != DataType::Text {
            return Err(Error::TypeMismatch {
                expected: "a TEXT group column".into(),
                found: column.data_type.to_string(),
            });
        }
    }

    let summed: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.data_type.is_numeric() && Some(c.name.as_str()) != column_name)
        .map(|(i, _)| i)
        .collect();
    aggregate(registry, table_name, column_name, &summed, new_name)
}

pub fn group_table(
    registry: &mut Registry,
    table_name: &str,
    group_column: &str,
    columns: &[String],
    new_name: &str,
) -> Result<CommandOutput> {
    let table = registry.require(table_name)?;
    table
        .column_index(group_column)
        .ok_or_else(|| Error::ColumnNotFound(group_column.into()))?;

    let mut summed = Vec::with_capacity(columns.len());
    for name in columns {
        let (idx, column) = table
            .get_column(name)
            .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
        if !column.data_type.is_numeric() {
            return Err(Error::TypeMismatch {
                expected: "an INT or REAL column".into(),
                found: format!("TEXT column '{}'", name),
            });
        }
        summed.push(idx);
    }
    aggregate(registry, table_name, Some(group_column), &summed, new_name)
}

/// Shared fold: groups the source by `group_column` (or folds everything
/// into one group when None) and sums the `summed` columns into a new
/// registered table.
fn aggregate(
    registry: &mut Registry,
    table_name: &str,
    group_column: Option<&str>,
    summed: &[usize],
    new_name: &str,
) -> Result<CommandOutput> {
    if registry.contains(new_name) {
        return Err(Error::DuplicateTable(new_name.into()));
    }
    let table = registry.require(table_name)?;
    let group_idx = group_column.and_then(|name| table.column_index(name));

    let mut columns = Vec::with_capacity(summed.len() + 1);
    if let Some(idx) = group_idx {
        columns.push(table.columns[idx].clone());
    }
    columns.extend(summed.iter().map(|&i| table.columns[i].clone()));
    let mut result = Table::new(new_name, columns)?;

    // Group keys map to an output row; sums accumulate in place.
    let mut groups: HashMap<Value, usize> = HashMap::new();
    for row in &table.rows {
        let out = match group_idx {
            Some(idx) => {
                let key = row[idx].clone();
                match groups.get(&key) {
                    Some(&out) => out,
                    None => {
                        let mut fresh = vec![key.clone()];
                        fresh.extend(
                            summed
                                .iter()
                                .map(|&i| Value::default_for(table.columns[i].data_type)),
                        );
                        result.rows.push(fresh);
                        groups.insert(key, result.rows.len() - 1);
                        result.rows.len() - 1
                    }
                }
            }
            None => {
                if result.rows.is_empty() {
                    result.rows.push(
                        summed
                            .iter()
                            .map(|&i| Value::default_for(table.columns[i].data_type))
                            .collect(),
                    );
                }
                0
            }
        };

        let offset = usize::from(group_idx.is_some());
        for (slot, &src) in summed.iter().enumerate() {
            let acc = &mut result.rows[out][slot + offset];
            *acc = accumulate(acc, &row[src])?;
        }
    }

    registry.insert(result.clone())?;
    Ok(CommandOutput::created(result))
}

/// Adds a cell into an accumulator of the column's type. Cells that are not
/// numeric (stray text in a converted column) contribute nothing.
fn accumulate(acc: &Value, cell: &Value) -> Result<Value> {
    match (acc, cell) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or_else(|| Error::InvalidValue("integer overflow".into())),
        (acc, cell) => match (acc.as_number(), cell.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Real(a + b)),
            _ => Ok(acc.clone()),
        },
    }
}
