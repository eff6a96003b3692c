//! Row ingress
//!
//! Adding a row runs: type-default row → INIT rules → typed user fields →
//! FIXUP rules → CHECK rules → commit. Updating runs the same pipeline
//! without INIT. Failures accumulate per column and every CHECK still runs,
//! so the caller sees the full error set; the table is only touched when
//! that set is empty.

use super::{RuleOp, RuleSet};
use crate::error::{Error, Result};
use crate::execution::expression::evaluate;
use crate::parsing::ast::Expression;
use crate::registry::Registry;
use crate::types::{Clock, DataType, Row, RowContext, Table, Value};
use std::collections::HashMap;

/// Builds and commits a new row from user fields. Returns the updated
/// table, or the accumulated `ValidationFailure`.
pub fn add_row(
    registry: &mut Registry,
    table_name: &str,
    fields: &HashMap<String, String>,
    rules: &RuleSet,
    clock: &dyn Clock,
) -> Result<Table> {
    let (candidate, errors) = {
        let table = registry.require(table_name)?;
        let mut candidate = table.default_row();
        let mut errors = ErrorSet::new();

        // INIT fires on the add path only, before user fields.
        let row = table.rows.len();
        for rule in rules.of(RuleOp::Init) {
            apply_write_rule(
                registry, table, row, &mut candidate, &rule.column, &rule.expr, clock,
                &mut errors,
            );
        }
        apply_fields(table, &mut candidate, fields, &mut errors);
        run_rules(registry, table, row, &mut candidate, rules, clock, &mut errors);
        (candidate, errors)
    };

    if !errors.is_empty() {
        return Err(errors.into_failure());
    }
    let table = registry.require_mut(table_name)?;
    table.rows.push(candidate);
    Ok(table.clone())
}

/// Re-runs the pipeline (without INIT) over an existing row and commits the
/// result in place.
pub fn update_row(
    registry: &mut Registry,
    table_name: &str,
    row: usize,
    fields: &HashMap<String, String>,
    rules: &RuleSet,
    clock: &dyn Clock,
) -> Result<Table> {
    let (candidate, errors) = {
        let table = registry.require(table_name)?;
        let mut candidate = table
            .rows
            .get(row)
            .cloned()
            .ok_or_else(|| Error::InvalidParameter(format!("row {} out of range", row)))?;
        let mut errors = ErrorSet::new();

        apply_fields(table, &mut candidate, fields, &mut errors);
        run_rules(registry, table, row, &mut candidate, rules, clock, &mut errors);
        (candidate, errors)
    };

    if !errors.is_empty() {
        return Err(errors.into_failure());
    }
    let table = registry.require_mut(table_name)?;
    table.rows[row] = candidate;
    Ok(table.clone())
}

/// Converts user-supplied fields to their column types. Fields that name no
/// schema column are ignored; unparsable INT/REAL input marks the column.
fn apply_fields(
    table: &Table,
    candidate: &mut Row,
    fields: &HashMap<String, String>,
    errors: &mut ErrorSet,
) {
    for (idx, column) in table.columns.iter().enumerate() {
        let Some(raw) = fields.get(&column.name) else {
            continue;
        };
        match column.data_type {
            DataType::Text => candidate[idx] = Value::text(raw.as_str()),
            DataType::Int => match raw.trim().parse::<i64>() {
                Ok(n) => candidate[idx] = Value::Int(n),
                Err(_) => errors.add(&column.name),
            },
            DataType::Real => match raw.trim().parse::<f64>() {
                Ok(n) => candidate[idx] = Value::Real(n),
                Err(_) => errors.add(&column.name),
            },
        }
    }
}

/// The FIXUP then CHECK phases, shared by both ingress paths.
fn run_rules(
    registry: &Registry,
    table: &Table,
    row: usize,
    candidate: &mut Row,
    rules: &RuleSet,
    clock: &dyn Clock,
    errors: &mut ErrorSet,
) {
    for rule in rules.of(RuleOp::Fixup) {
        apply_write_rule(
            registry, table, row, candidate, &rule.column, &rule.expr, clock, errors,
        );
    }
    // Every CHECK runs so the error set is complete.
    for rule in rules.of(RuleOp::Check) {
        let passed = eval_against(registry, table, row, candidate, &rule.expr, clock)
            .map(|v| v.is_truthy())
            .unwrap_or(false);
        if !passed {
            errors.add(&rule.column);
        }
    }
}

/// Evaluates a writing rule (INIT/FIXUP) and stores the result, coerced to
/// the column's type. Any failure marks the column.
fn apply_write_rule(
    registry: &Registry,
    table: &Table,
    row: usize,
    candidate: &mut Row,
    column: &str,
    expr: &Expression,
    clock: &dyn Clock,
    errors: &mut ErrorSet,
) {
    let Some((idx, descriptor)) = table.get_column(column) else {
        errors.add(column);
        return;
    };
    let value = eval_against(registry, table, row, candidate, expr, clock)
        .and_then(|v| v.coerce(descriptor.data_type));
    match value {
        Ok(value) => candidate[idx] = value,
        Err(_) => errors.add(column),
    }
}

fn eval_against(
    registry: &Registry,
    table: &Table,
    row: usize,
    candidate: &Row,
    expr: &Expression,
    clock: &dyn Clock,
) -> Result<Value> {
    let mut ctx = RowContext::new(registry, table, row, clock);
    ctx.candidate = Some(candidate);
    evaluate(expr, &ctx)
}

/// The offending columns, deduplicated, in first-failure order.
struct ErrorSet(Vec<String>);

impl ErrorSet {
    fn new() -> Self {
        ErrorSet(Vec::new())
    }

    fn add(&mut self, column: &str) {
        if !self.0.iter().any(|c| c == column) {
            self.0.push(column.to_string());
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_failure(self) -> Error {
        Error::ValidationFailure { columns: self.0 }
    }
}
