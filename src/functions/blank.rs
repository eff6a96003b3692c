//! BLANK function - tests a value for the type-specific zero

use super::{Function, FunctionRegistry, FunctionSignature, column_or_value};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value, evaluator::from_bool};

pub struct BlankFunction;

impl Function for BlankFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "BLANK",
            min_args: 1,
            max_args: Some(1),
            description: "1 iff the value is empty text, 0, or 0.0",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        // A bare identifier is tried as a column first, then as literal text.
        let value = column_or_value(&args[0], ctx)?;
        Ok(from_bool(value.is_blank()))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(BlankFunction));
}
