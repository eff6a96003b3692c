//! LENGTH function - character count

use super::{Function, FunctionRegistry, FunctionSignature, text_argument};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct LengthFunction;

impl Function for LengthFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "LENGTH",
            min_args: 1,
            max_args: Some(1),
            description: "Character count of the stringified argument",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        // Characters, not bytes.
        let text = text_argument(&args[0], ctx)?;
        Ok(Value::Int(text.chars().count() as i64))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(LengthFunction));
}
