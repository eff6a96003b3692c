//! MONTH function - current month, zero-padded

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct MonthFunction;

impl Function for MonthFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "MONTH",
            min_args: 0,
            max_args: Some(0),
            description: "Current month as two digits",
        };
        &SIGNATURE
    }

    fn execute(&self, _args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Text(ctx.clock.now().format("%m").to_string()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(MonthFunction));
}
