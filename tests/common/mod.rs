//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tabula::{CommandOutput, Engine, FixedClock, Result, Table, Value};
use tempfile::TempDir;

/// The two-row sales table used across suites.
pub const SALES_CSV: &str = "Date:TEXT,Amount:REAL\n2024-01-01,100.5\n2024-01-02,200.0\n";

pub struct TestContext {
    pub dir: TempDir,
    pub engine: Engine,
}

/// Builds a data directory from `(file name, content)` pairs and opens an
/// engine over it with a clock pinned to 2024-03-07 09:05:02.
pub fn setup(files: &[(&str, &str)]) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    let engine = Engine::with_clock(dir.path(), Box::new(clock())).unwrap();
    TestContext { dir, engine }
}

pub fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap(),
    )
}

impl TestContext {
    /// Executes a command through the untyped surface, as the transport
    /// layer would.
    pub fn execute(&self, name: &str, params: serde_json::Value) -> Result<CommandOutput> {
        self.engine.execute_raw(name, params)
    }

    pub fn table(&self, name: &str) -> Table {
        self.engine.table(name).unwrap()
    }

    pub fn cell(&self, table: &str, row: usize, column: &str) -> Value {
        let table = self.table(table);
        let idx = table.column_index(column).unwrap();
        table.rows[row][idx].clone()
    }

    /// A whole column's values, top to bottom.
    pub fn column(&self, table: &str, column: &str) -> Vec<Value> {
        let table = self.table(table);
        let idx = table.column_index(column).unwrap();
        table.rows.iter().map(|r| r[idx].clone()).collect()
    }

    pub fn add_row(&self, table: &str, fields: &[(&str, &str)]) -> Result<Table> {
        self.engine.add_row(table, &to_fields(fields))
    }

    pub fn update_row(&self, table: &str, row: usize, fields: &[(&str, &str)]) -> Result<Table> {
        self.engine.update_row(table, row, &to_fields(fields))
    }
}

fn to_fields(fields: &[(&str, &str)]) -> HashMap<String, String> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Asserts a REAL cell is within float tolerance of the expected value.
pub fn assert_real(value: &Value, expected: f64) {
    match value {
        Value::Real(n) => assert!(
            (n - expected).abs() < 1e-9,
            "expected Real({}), got Real({})",
            expected,
            n
        ),
        other => panic!("expected Real({}), got {:?}", expected, other),
    }
}
