//! The command algebra
//!
//! Every table transformation is a [`Command`], executed atomically against
//! the registry: parameters are validated up front and the registry is only
//! touched once the whole result is known. The enum doubles as the wire
//! surface; its serde tag is the command name and its fields are the
//! camelCase parameters callers pass.

pub mod expression;

mod aggregate;
mod columns;
mod delete;
mod join;
mod tables;

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::storage::files;
use crate::types::{Clock, DataType, Table};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use tables::SortOrder;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    SaveTable { table_name: String },

    #[serde(rename_all = "camelCase")]
    DropColumns {
        table_name: String,
        columns: Vec<String>,
    },

    #[serde(rename_all = "camelCase")]
    RenameColumn {
        table_name: String,
        old: String,
        new: String,
    },

    #[serde(rename_all = "camelCase")]
    RenameTable {
        table_name: String,
        new_name: String,
    },

    #[serde(rename_all = "camelCase")]
    DeleteRows {
        table_name: String,
        expression: String,
    },

    #[serde(rename_all = "camelCase")]
    CollapseTable {
        table_name: String,
        #[serde(default)]
        column_name: Option<String>,
        new_name: String,
    },

    #[serde(rename_all = "camelCase")]
    ReplaceText {
        table_name: String,
        column_name: String,
        regex: String,
        replacement: String,
    },

    #[serde(rename_all = "camelCase")]
    AddColumn {
        table_name: String,
        column_name: String,
        expression: String,
        column_type: DataType,
    },

    #[serde(rename_all = "camelCase")]
    SetValue {
        table_name: String,
        column_name: String,
        expression: String,
    },

    #[serde(rename_all = "camelCase")]
    JoinTable {
        table_name: String,
        table_name1: String,
        join_column: String,
        new_name: String,
    },

    #[serde(rename_all = "camelCase")]
    CopyTable {
        table_name: String,
        new_name: String,
    },

    #[serde(rename_all = "camelCase")]
    SortTable {
        table_name: String,
        column_name: String,
        order: SortOrder,
    },

    #[serde(rename_all = "camelCase")]
    DeleteTable { table_name: String },

    #[serde(rename_all = "camelCase")]
    GroupTable {
        table_name: String,
        group_column: String,
        columns: Vec<String>,
        new_name: String,
    },

    #[serde(rename_all = "camelCase")]
    ReorderColumns {
        table_name: String,
        columns: Vec<String>,
    },

    #[serde(rename_all = "camelCase")]
    ConvertColumn {
        table_name: String,
        column_name: String,
    },

    #[serde(rename_all = "camelCase")]
    SpliceTables {
        new_name: String,
        selected_tables: Vec<String>,
    },
}

impl Command {
    /// Builds a command from its wire name and an untyped parameter object.
    pub fn from_parts(name: &str, params: serde_json::Value) -> Result<Command> {
        let mut object = match params {
            serde_json::Value::Object(object) => object,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(Error::InvalidParameter(format!(
                    "expected a parameter object, got {}",
                    other
                )));
            }
        };
        object.insert("command".into(), serde_json::Value::String(name.into()));
        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| Error::InvalidParameter(e.to_string()))
    }

    /// The command's wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SaveTable { .. } => "SAVE_TABLE",
            Command::DropColumns { .. } => "DROP_COLUMNS",
            Command::RenameColumn { .. } => "RENAME_COLUMN",
            Command::RenameTable { .. } => "RENAME_TABLE",
            Command::DeleteRows { .. } => "DELETE_ROWS",
            Command::CollapseTable { .. } => "COLLAPSE_TABLE",
            Command::ReplaceText { .. } => "REPLACE_TEXT",
            Command::AddColumn { .. } => "ADD_COLUMN",
            Command::SetValue { .. } => "SET_VALUE",
            Command::JoinTable { .. } => "JOIN_TABLE",
            Command::CopyTable { .. } => "COPY_TABLE",
            Command::SortTable { .. } => "SORT_TABLE",
            Command::DeleteTable { .. } => "DELETE_TABLE",
            Command::GroupTable { .. } => "GROUP_TABLE",
            Command::ReorderColumns { .. } => "REORDER_COLUMNS",
            Command::ConvertColumn { .. } => "CONVERT_COLUMN",
            Command::SpliceTables { .. } => "SPLICE_TABLES",
        }
    }
}

/// What a command hands back: the updated (or created) table, and the new
/// table name for creating commands. The registry stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    pub table: Option<Table>,
    pub new_name: Option<String>,
}

impl CommandOutput {
    fn table(table: Table) -> Self {
        CommandOutput {
            table: Some(table),
            new_name: None,
        }
    }

    fn created(table: Table) -> Self {
        let new_name = Some(table.name.clone());
        CommandOutput {
            table: Some(table),
            new_name,
        }
    }

    fn empty() -> Self {
        CommandOutput {
            table: None,
            new_name: None,
        }
    }
}

/// Executes one command against the registry. Callers are allowed to pass
/// table names with a `.csv` suffix; it is stripped here.
pub fn execute(
    command: Command,
    registry: &mut Registry,
    data_dir: &Path,
    clock: &dyn Clock,
) -> Result<CommandOutput> {
    tracing::debug!(command = command.name(), "executing command");

    match command {
        Command::SaveTable { table_name } => {
            tables::save_table(registry, table(&table_name), data_dir)
        }
        Command::DropColumns {
            table_name,
            columns,
        } => columns::drop_columns(registry, table(&table_name), &columns),
        Command::RenameColumn {
            table_name,
            old,
            new,
        } => columns::rename_column(registry, table(&table_name), &old, &new),
        Command::RenameTable {
            table_name,
            new_name,
        } => tables::rename_table(registry, table(&table_name), table(&new_name)),
        Command::DeleteRows {
            table_name,
            expression,
        } => delete::delete_rows(registry, table(&table_name), &expression, clock),
        Command::CollapseTable {
            table_name,
            column_name,
            new_name,
        } => aggregate::collapse_table(
            registry,
            table(&table_name),
            column_name.as_deref().filter(|c| !c.is_empty()),
            table(&new_name),
        ),
        Command::ReplaceText {
            table_name,
            column_name,
            regex,
            replacement,
        } => columns::replace_text(registry, table(&table_name), &column_name, &regex, &replacement),
        Command::AddColumn {
            table_name,
            column_name,
            expression,
            column_type,
        } => columns::add_column(
            registry,
            table(&table_name),
            &column_name,
            &expression,
            column_type,
            clock,
        ),
        Command::SetValue {
            table_name,
            column_name,
            expression,
        } => columns::set_value(registry, table(&table_name), &column_name, &expression, clock),
        Command::JoinTable {
            table_name,
            table_name1,
            join_column,
            new_name,
        } => join::join_table(
            registry,
            table(&table_name),
            table(&table_name1),
            &join_column,
            table(&new_name),
        ),
        Command::CopyTable {
            table_name,
            new_name,
        } => tables::copy_table(registry, table(&table_name), table(&new_name)),
        Command::SortTable {
            table_name,
            column_name,
            order,
        } => tables::sort_table(registry, table(&table_name), &column_name, order),
        Command::DeleteTable { table_name } => {
            tables::delete_table(registry, table(&table_name))
        }
        Command::GroupTable {
            table_name,
            group_column,
            columns,
            new_name,
        } => aggregate::group_table(
            registry,
            table(&table_name),
            &group_column,
            &columns,
            table(&new_name),
        ),
        Command::ReorderColumns {
            table_name,
            columns,
        } => columns::reorder_columns(registry, table(&table_name), &columns),
        Command::ConvertColumn {
            table_name,
            column_name,
        } => columns::convert_column(registry, table(&table_name), &column_name),
        Command::SpliceTables {
            new_name,
            selected_tables,
        } => {
            let sources: Vec<&str> = selected_tables.iter().map(|t| table(t)).collect();
            tables::splice_tables(registry, table(&new_name), &sources)
        }
    }
}

/// Normalizes a caller-supplied table name.
fn table(name: &str) -> &str {
    files::strip_csv_suffix(name)
}
