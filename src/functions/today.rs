//! TODAY function - current date as YYYY/MM/DD

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct TodayFunction;

impl Function for TodayFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "TODAY",
            min_args: 0,
            max_args: Some(0),
            description: "Current date as YYYY/MM/DD",
        };
        &SIGNATURE
    }

    fn execute(&self, _args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Text(ctx.clock.now().format("%Y/%m/%d").to_string()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(TodayFunction));
}
