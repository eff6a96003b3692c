//! Expression evaluation
//!
//! Walks the parsed AST against a row context. The walker owns control flow
//! (short-circuit logic, conditionals, field resolution); value-level
//! arithmetic lives in `types::evaluator` and builtins in `functions`.

use crate::error::{Error, Result};
use crate::functions;
use crate::parsing::ast::{Expression, Literal, Operator};
use crate::types::evaluator::{self, from_bool};
use crate::types::{RowContext, Value};

/// Evaluates an expression against a row context.
pub fn evaluate(expr: &Expression, ctx: &RowContext) -> Result<Value> {
    match expr {
        Expression::Literal(Literal::Integer(n)) => Ok(Value::Int(*n)),
        Expression::Literal(Literal::Float(n)) => Ok(Value::Real(*n)),
        Expression::Literal(Literal::String(s)) => Ok(Value::Text(s.clone())),

        Expression::Field(name) => ctx
            .field(name)
            .ok_or_else(|| Error::ExpressionError(format!("unknown identifier '{}'", name))),

        // col[expr]: the column's value in the row at current + offset.
        // Out-of-range references produce empty TEXT, so edge rows can use
        // neighbours without guarding.
        Expression::IndexedField(name, offset) => {
            let idx = ctx
                .table
                .column_index(name)
                .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
            let offset = evaluate(offset, ctx)?
                .as_number()
                .ok_or_else(|| Error::TypeMismatch {
                    expected: "a numeric row offset".into(),
                    found: "TEXT".into(),
                })?;
            let target = ctx.row as i64 + offset.round() as i64;
            if target < 0 || target as usize >= ctx.table.rows.len() {
                return Ok(Value::text(""));
            }
            Ok(ctx.table.rows[target as usize][idx].clone())
        }

        Expression::Function(name, args) => functions::execute_function(name, args, ctx),

        // Only the taken branch is evaluated.
        Expression::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if evaluate(condition, ctx)?.is_truthy() {
                evaluate(then, ctx)
            } else {
                evaluate(otherwise, ctx)
            }
        }

        Expression::Operator(op) => match op {
            // Logical operators short-circuit and return 1/0.
            Operator::And(lhs, rhs) => {
                if !evaluate(lhs, ctx)?.is_truthy() {
                    return Ok(from_bool(false));
                }
                Ok(from_bool(evaluate(rhs, ctx)?.is_truthy()))
            }
            Operator::Or(lhs, rhs) => {
                if evaluate(lhs, ctx)?.is_truthy() {
                    return Ok(from_bool(true));
                }
                Ok(from_bool(evaluate(rhs, ctx)?.is_truthy()))
            }
            Operator::Not(expr) => Ok(from_bool(!evaluate(expr, ctx)?.is_truthy())),

            Operator::Equal(lhs, rhs) => {
                let ord = evaluator::compare(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)?;
                Ok(from_bool(ord == std::cmp::Ordering::Equal))
            }
            Operator::NotEqual(lhs, rhs) => {
                let ord = evaluator::compare(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)?;
                Ok(from_bool(ord != std::cmp::Ordering::Equal))
            }
            Operator::LessThan(lhs, rhs) => {
                let ord = evaluator::compare(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)?;
                Ok(from_bool(ord == std::cmp::Ordering::Less))
            }
            Operator::GreaterThan(lhs, rhs) => {
                let ord = evaluator::compare(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)?;
                Ok(from_bool(ord == std::cmp::Ordering::Greater))
            }

            Operator::Add(lhs, rhs) => {
                evaluator::add(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)
            }
            Operator::Subtract(lhs, rhs) => {
                evaluator::subtract(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)
            }
            Operator::Multiply(lhs, rhs) => {
                evaluator::multiply(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)
            }
            Operator::Divide(lhs, rhs) => {
                evaluator::divide(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)
            }
            Operator::Exponentiate(lhs, rhs) => {
                evaluator::exponentiate(&evaluate(lhs, ctx)?, &evaluate(rhs, ctx)?)
            }
            Operator::Negate(expr) => evaluator::negate(&evaluate(expr, ctx)?),
        },
    }
}
