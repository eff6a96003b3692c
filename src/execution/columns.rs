//! Column commands: dropping, renaming, reordering, deriving, and
//! converting columns.
//!
//! Commands that derive values parse their expression once and run in two
//! phases: evaluate every row against an immutable borrow of the table,
//! then apply the results. A failed evaluation fails the whole command
//! before anything is mutated.

use super::CommandOutput;
use super::expression::evaluate;
use crate::error::{Error, Result};
use crate::parsing::parse_expression;
use crate::registry::Registry;
use crate::types::schema::is_identifier;
use crate::types::{Column, DataType, RowContext, Value};
use regex::Regex;

pub fn drop_columns(
    registry: &mut Registry,
    table_name: &str,
    columns: &[String],
) -> Result<CommandOutput> {
    if columns.is_empty() {
        return Err(Error::InvalidParameter("no columns given".into()));
    }
    let table = registry.require(table_name)?;
    for column in columns {
        if !table.has_column(column) {
            return Err(Error::ColumnNotFound(column.clone()));
        }
    }

    let keep: Vec<bool> = table
        .columns
        .iter()
        .map(|c| !columns.contains(&c.name))
        .collect();
    let table = registry.require_mut(table_name)?;
    retain_by_mask(&mut table.columns, &keep);
    for row in &mut table.rows {
        retain_by_mask(row, &keep);
    }
    Ok(CommandOutput::table(table.clone()))
}

pub fn rename_column(
    registry: &mut Registry,
    table_name: &str,
    old: &str,
    new: &str,
) -> Result<CommandOutput> {
    if !is_identifier(new) {
        return Err(Error::InvalidValue(format!(
            "'{}' is not a valid column name",
            new
        )));
    }
    let table = registry.require_mut(table_name)?;
    if table.has_column(new) {
        return Err(Error::DuplicateColumn(new.into()));
    }
    let idx = table
        .column_index(old)
        .ok_or_else(|| Error::ColumnNotFound(old.into()))?;
    table.columns[idx].name = new.to_string();
    Ok(CommandOutput::table(table.clone()))
}

pub fn reorder_columns(
    registry: &mut Registry,
    table_name: &str,
    columns: &[String],
) -> Result<CommandOutput> {
    let table = registry.require(table_name)?;
    let mut order = Vec::with_capacity(table.columns.len());
    for column in columns {
        let idx = table
            .column_index(column)
            .ok_or_else(|| Error::ColumnNotFound(column.clone()))?;
        if order.contains(&idx) {
            return Err(Error::InvalidParameter(format!(
                "column '{}' listed twice",
                column
            )));
        }
        order.push(idx);
    }
    // Remaining columns keep their original order, after the listed ones.
    for idx in 0..table.columns.len() {
        if !order.contains(&idx) {
            order.push(idx);
        }
    }

    let table = registry.require_mut(table_name)?;
    table.columns = permute(&table.columns, &order);
    for row in &mut table.rows {
        *row = permute(row, &order);
    }
    Ok(CommandOutput::table(table.clone()))
}

pub fn add_column(
    registry: &mut Registry,
    table_name: &str,
    column_name: &str,
    expression: &str,
    column_type: DataType,
    clock: &dyn crate::types::Clock,
) -> Result<CommandOutput> {
    if !is_identifier(column_name) {
        return Err(Error::InvalidValue(format!(
            "'{}' is not a valid column name",
            column_name
        )));
    }
    let expr = parse_expression(expression)?;
    let table = registry.require(table_name)?;
    if table.has_column(column_name) {
        return Err(Error::DuplicateColumn(column_name.into()));
    }

    let values = {
        let mut ctx = RowContext::new(registry, table, 0, clock);
        (0..table.rows.len())
            .map(|i| {
                ctx.row = i;
                evaluate(&expr, &ctx)
            })
            .collect::<Result<Vec<_>>>()?
    };

    let table = registry.require_mut(table_name)?;
    table.columns.push(Column::new(column_name, column_type));
    // The evaluation result is stored as-is; the declared type governs
    // later parsing and serialization, not this write.
    for (row, value) in table.rows.iter_mut().zip(values) {
        row.push(value);
    }
    Ok(CommandOutput::table(table.clone()))
}

pub fn set_value(
    registry: &mut Registry,
    table_name: &str,
    column_name: &str,
    expression: &str,
    clock: &dyn crate::types::Clock,
) -> Result<CommandOutput> {
    let expr = parse_expression(expression)?;
    let table = registry.require(table_name)?;
    let idx = table
        .column_index(column_name)
        .ok_or_else(|| Error::ColumnNotFound(column_name.into()))?;

    let values = {
        let mut ctx = RowContext::new(registry, table, 0, clock);
        (0..table.rows.len())
            .map(|i| {
                ctx.row = i;
                evaluate(&expr, &ctx)
            })
            .collect::<Result<Vec<_>>>()?
    };

    let table = registry.require_mut(table_name)?;
    for (row, value) in table.rows.iter_mut().zip(values) {
        row[idx] = value;
    }
    Ok(CommandOutput::table(table.clone()))
}

/// Converts a TEXT column to REAL, stripping `$`, `,`, and whitespace from
/// each cell. Cells that still fail to parse keep their text; the column
/// type changes regardless.
pub fn convert_column(
    registry: &mut Registry,
    table_name: &str,
    column_name: &str,
) -> Result<CommandOutput> {
    let table = registry.require_mut(table_name)?;
    let (idx, column) = table
        .get_column(column_name)
        .ok_or_else(|| Error::ColumnNotFound(column_name.into()))?;
    if column.data_type != DataType::Text {
        return Err(Error::TypeMismatch {
            expected: "a TEXT column".into(),
            found: column.data_type.to_string(),
        });
    }

    for row in &mut table.rows {
        if let Value::Text(s) = &row[idx] {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
                .collect();
            if let Ok(n) = cleaned.parse::<f64>() {
                row[idx] = Value::Real(n);
            }
        }
    }
    table.columns[idx].data_type = DataType::Real;
    Ok(CommandOutput::table(table.clone()))
}

/// Global regex replace over every row of a TEXT column.
pub fn replace_text(
    registry: &mut Registry,
    table_name: &str,
    column_name: &str,
    pattern: &str,
    replacement: &str,
) -> Result<CommandOutput> {
    let regex =
        Regex::new(pattern).map_err(|e| Error::InvalidParameter(format!("invalid regex: {}", e)))?;
    let table = registry.require_mut(table_name)?;
    let (idx, column) = table
        .get_column(column_name)
        .ok_or_else(|| Error::ColumnNotFound(column_name.into()))?;
    if column.data_type != DataType::Text {
        return Err(Error::TypeMismatch {
            expected: "a TEXT column".into(),
            found: column.data_type.to_string(),
        });
    }

    for row in &mut table.rows {
        if let Value::Text(s) = &row[idx] {
            row[idx] = Value::text(regex.replace_all(s, replacement).into_owned());
        }
    }
    Ok(CommandOutput::table(table.clone()))
}

fn retain_by_mask<T>(items: &mut Vec<T>, keep: &[bool]) {
    let mut i = 0;
    items.retain(|_| {
        let kept = keep[i];
        i += 1;
        kept
    });
}

fn permute<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| items[i].clone()).collect()
}
