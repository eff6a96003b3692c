//! Evaluation context for expressions
//!
//! Expressions are evaluated against a row of a table, with the registry in
//! reach so cross-table aggregates resolve. The wall clock is injected so
//! date/time functions stay deterministic under test.

use super::schema::Table;
use super::value::{Row, Value};
use crate::registry::Registry;
use chrono::NaiveDateTime;

/// Source of the current wall-clock instant for TODAY/NOW and friends.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock pinned to a fixed instant, for deterministic evaluation.
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// The row context an expression is evaluated in. Rebinding `row` across a
/// batch is a field assignment; the parsed expression is reused.
pub struct RowContext<'a> {
    /// All loaded tables, for cross-table functions like TOTAL.
    pub registry: &'a Registry,
    /// The table the expression runs against.
    pub table: &'a Table,
    /// Index of the current row in `table`.
    pub row: usize,
    /// A row not yet committed to the table (row ingress). When set, field
    /// references resolve here instead of `table.rows[row]`.
    pub candidate: Option<&'a Row>,
    /// Injected wall clock.
    pub clock: &'a dyn Clock,
}

impl<'a> RowContext<'a> {
    pub fn new(
        registry: &'a Registry,
        table: &'a Table,
        row: usize,
        clock: &'a dyn Clock,
    ) -> Self {
        RowContext {
            registry,
            table,
            row,
            candidate: None,
            clock,
        }
    }

    /// Resolves a column of the current row, if the column exists.
    pub fn field(&self, column: &str) -> Option<Value> {
        let idx = self.table.column_index(column)?;
        if let Some(row) = self.candidate {
            return row.get(idx).cloned();
        }
        Some(
            self.table
                .rows
                .get(self.row)
                .and_then(|r| r.get(idx))
                .cloned()
                .unwrap_or_else(|| Value::default_for(self.table.columns[idx].data_type)),
        )
    }
}
