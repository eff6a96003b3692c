//! YEAR function - current four-digit year

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct YearFunction;

impl Function for YearFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "YEAR",
            min_args: 0,
            max_args: Some(0),
            description: "Current year as four digits",
        };
        &SIGNATURE
    }

    fn execute(&self, _args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Text(ctx.clock.now().format("%Y").to_string()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(YearFunction));
}
