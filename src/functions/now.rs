//! NOW function - current time as HH:MM:SS

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct NowFunction;

impl Function for NowFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "NOW",
            min_args: 0,
            max_args: Some(0),
            description: "Current wall-clock time as HH:MM:SS",
        };
        &SIGNATURE
    }

    fn execute(&self, _args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Text(ctx.clock.now().format("%H:%M:%S").to_string()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(NowFunction));
}
