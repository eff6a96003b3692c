//! CURR_ROW function - index of the current row

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct CurrRowFunction;

impl Function for CurrRowFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "CURR_ROW",
            min_args: 0,
            max_args: Some(0),
            description: "Zero-based index of the current row",
        };
        &SIGNATURE
    }

    fn execute(&self, _args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Int(ctx.row as i64))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(CurrRowFunction));
}
