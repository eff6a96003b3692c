//! Builtin expression functions
//!
//! A trait-based registry of the functions callable from expressions.
//! Functions receive their arguments *unevaluated* so the handful that
//! interpret an argument as a bare column name (BLANK, TOTAL, SUM, REGEXP,
//! REPLACE) can resolve it themselves; everything else evaluates arguments
//! through the expression walker. Names match case-insensitively.

use crate::error::{Error, Result};
use crate::execution::expression::evaluate;
use crate::parsing::ast::{Expression, Literal};
use crate::types::{RowContext, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

// String functions
mod append;
mod length;
mod regexp;
mod replace;
mod upper;

// Value tests
mod blank;

// Date/time functions
mod day;
mod month;
mod now;
mod today;
mod year;

// Table functions
mod curr_row;
mod num_rows;
mod sum;
mod total;

/// Metadata about a function's signature.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    /// Function name (uppercase).
    pub name: &'static str,
    /// Minimum number of arguments.
    pub min_args: usize,
    /// Maximum number of arguments; None means unbounded.
    pub max_args: Option<usize>,
    pub description: &'static str,
}

/// Trait for expression functions.
pub trait Function: Send + Sync {
    /// Get the function's signature.
    fn signature(&self) -> &FunctionSignature;

    /// Execute the function. Arguments arrive as written; most
    /// implementations evaluate them via the expression walker.
    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value>;
}

/// Registry of all builtin functions.
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn Function>>,
}

impl FunctionRegistry {
    fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        append::register(&mut registry);
        blank::register(&mut registry);
        curr_row::register(&mut registry);
        day::register(&mut registry);
        length::register(&mut registry);
        month::register(&mut registry);
        now::register(&mut registry);
        num_rows::register(&mut registry);
        regexp::register(&mut registry);
        replace::register(&mut registry);
        sum::register(&mut registry);
        today::register(&mut registry);
        total::register(&mut registry);
        upper::register(&mut registry);
        year::register(&mut registry);

        registry
    }

    fn register(&mut self, function: Box<dyn Function>) {
        let name = function.signature().name.to_string();
        self.functions.insert(name, function);
    }
}

static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::new);

/// Look up a function by name (case-insensitive).
pub fn get_function(name: &str) -> Option<&'static dyn Function> {
    REGISTRY
        .functions
        .get(&name.to_uppercase())
        .map(|f| f.as_ref())
}

/// Execute a function by name, validating arity against its signature.
pub fn execute_function(name: &str, args: &[Expression], ctx: &RowContext) -> Result<Value> {
    let Some(function) = get_function(name) else {
        return Err(Error::ExpressionError(format!("unknown function '{}'", name)));
    };
    let signature = function.signature();
    if args.len() < signature.min_args
        || signature.max_args.is_some_and(|max| args.len() > max)
    {
        return Err(Error::ExpressionError(format!(
            "{} takes {} argument(s), got {}",
            signature.name,
            match signature.max_args {
                Some(max) if max == signature.min_args => format!("{}", max),
                Some(max) => format!("{} to {}", signature.min_args, max),
                None => format!("at least {}", signature.min_args),
            },
            args.len()
        )));
    }
    function.execute(args, ctx)
}

/// Resolves an argument written as a bare identifier against the current
/// row, falling back to the identifier's own text when no such column
/// exists; any other argument shape is evaluated normally.
fn column_or_value(arg: &Expression, ctx: &RowContext) -> Result<Value> {
    match arg {
        Expression::Field(name) => Ok(ctx
            .field(name)
            .unwrap_or_else(|| Value::Text(name.clone()))),
        _ => evaluate(arg, ctx),
    }
}

/// Requires an argument to name something: a bare identifier or a quoted
/// string. Used for column and table name arguments.
fn name_argument<'a>(arg: &'a Expression, what: &str) -> Result<&'a str> {
    match arg {
        Expression::Field(name) => Ok(name),
        Expression::Literal(Literal::String(s)) => Ok(s),
        _ => Err(Error::ExpressionError(format!(
            "expected a {} name, found '{}'",
            what, arg
        ))),
    }
}

/// Evaluates an argument to its plain-text rendering.
fn text_argument(arg: &Expression, ctx: &RowContext) -> Result<String> {
    Ok(evaluate(arg, ctx)?.to_text())
}

/// Shared fixtures for function and evaluator tests.
#[cfg(test)]
pub(crate) mod testing {
    use crate::registry::Registry;
    use crate::types::{Column, DataType, FixedClock, Table, Value};
    use chrono::NaiveDate;

    /// A registry holding table `t`:
    ///
    /// | Name  | Amount | Score |
    /// |-------|--------|-------|
    /// | ada   | 10     | 1.5   |
    /// | grace | 20     | 2.5   |
    /// | linus | 30     | 4.0   |
    pub fn registry() -> Registry {
        let mut table = Table::new(
            "t",
            vec![
                Column::new("Name", DataType::Text),
                Column::new("Amount", DataType::Int),
                Column::new("Score", DataType::Real),
            ],
        )
        .unwrap();
        table.rows = vec![
            vec![Value::text("ada"), Value::Int(10), Value::Real(1.5)],
            vec![Value::text("grace"), Value::Int(20), Value::Real(2.5)],
            vec![Value::text("linus"), Value::Int(30), Value::Real(4.0)],
        ];
        let mut registry = Registry::new();
        registry.insert(table).unwrap();
        registry
    }

    /// A clock pinned to 2024-03-07 09:05:02.
    pub fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(9, 5, 2)
                .unwrap(),
        )
    }
}
