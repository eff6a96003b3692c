//! TOTAL function - sum of a numeric column across any registered table

use super::{Function, FunctionRegistry, FunctionSignature, name_argument};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct TotalFunction;

impl Function for TotalFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "TOTAL",
            min_args: 2,
            max_args: Some(2),
            description: "Sum of an INT/REAL column across the named table",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        let table_name = name_argument(&args[0], "table")?;
        let column_name = name_argument(&args[1], "column")?;

        // A missing table or column sums to zero rather than failing, so
        // rules can reference tables that are not always loaded.
        let Some(table) = ctx.registry.get(table_name) else {
            return Ok(Value::Real(0.0));
        };
        let Some(idx) = table.column_index(column_name) else {
            return Ok(Value::Real(0.0));
        };

        // Non-numeric cells contribute nothing, so a TEXT column sums to
        // zero rather than failing.
        let total = table
            .rows
            .iter()
            .filter_map(|row| row[idx].as_number())
            .sum();
        Ok(Value::Real(total))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(TotalFunction));
}
