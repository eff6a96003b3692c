//! UPPER function - converts text to uppercase

use super::{Function, FunctionRegistry, FunctionSignature, text_argument};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct UpperFunction;

impl Function for UpperFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "UPPER",
            min_args: 1,
            max_args: Some(1),
            description: "Uppercases the stringified argument",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        Ok(Value::Text(text_argument(&args[0], ctx)?.to_uppercase()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(UpperFunction));
}
