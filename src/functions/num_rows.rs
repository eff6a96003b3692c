//! NUM_ROWS function - row count of the current table

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct NumRowsFunction;

impl Function for NumRowsFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "NUM_ROWS",
            min_args: 0,
            max_args: Some(0),
            description: "Row count of the current table",
        };
        &SIGNATURE
    }

    fn execute(&self, _args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Int(ctx.table.rows.len() as i64))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(NumRowsFunction));
}
