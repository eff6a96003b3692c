//! DAY function - current day of month, zero-padded

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct DayFunction;

impl Function for DayFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "DAY",
            min_args: 0,
            max_args: Some(0),
            description: "Current day of month as two digits",
        };
        &SIGNATURE
    }

    fn execute(&self, _args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Text(ctx.clock.now().format("%d").to_string()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(DayFunction));
}
