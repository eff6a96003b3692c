//! JOIN_TABLE command

use super::CommandOutput;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::types::{Table, Value};
use std::collections::HashMap;

/// Joins two tables on equality of a shared column into a new table. Every
/// left row is kept; the first matching right row wins, and left rows with
/// no match fill the right-side cells with type defaults. The result takes
/// all left columns plus each right column that is neither the join column
/// nor a name the left side already has.
pub fn join_table(
    registry: &mut Registry,
    left_name: &str,
    right_name: &str,
    join_column: &str,
    new_name: &str,
) -> Result<CommandOutput> {
    if registry.contains(new_name) {
        return Err(Error::DuplicateTable(new_name.into()));
    }
    let left = registry.require(left_name)?;
    let right = registry.require(right_name)?;
    let left_key = left
        .column_index(join_column)
        .ok_or_else(|| Error::ColumnNotFound(join_column.into()))?;
    let right_key = right
        .column_index(join_column)
        .ok_or_else(|| Error::ColumnNotFound(join_column.into()))?;

    let taken: Vec<usize> = right
        .columns
        .iter()
        .enumerate()
        .filter(|(i, c)| *i != right_key && !left.has_column(&c.name))
        .map(|(i, _)| i)
        .collect();

    let mut columns = left.columns.clone();
    columns.extend(taken.iter().map(|&i| right.columns[i].clone()));
    let mut joined = Table::new(new_name, columns)?;

    // First occurrence of each key wins on duplicate right-side keys.
    let mut index: HashMap<&Value, usize> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        index.entry(&row[right_key]).or_insert(i);
    }

    for row in &left.rows {
        let mut out = row.clone();
        match index.get(&row[left_key]) {
            Some(&i) => out.extend(taken.iter().map(|&c| right.rows[i][c].clone())),
            None => out.extend(
                taken
                    .iter()
                    .map(|&c| Value::default_for(right.columns[c].data_type)),
            ),
        }
        joined.rows.push(out);
    }

    registry.insert(joined.clone())?;
    Ok(CommandOutput::created(joined))
}
