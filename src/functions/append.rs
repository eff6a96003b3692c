//! APPEND function - string concatenation

use super::{Function, FunctionRegistry, FunctionSignature, text_argument};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};

pub struct AppendFunction;

impl Function for AppendFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "APPEND",
            min_args: 2,
            max_args: Some(2),
            description: "Concatenation of the stringified arguments",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        let mut out = text_argument(&args[0], ctx)?;
        out.push_str(&text_argument(&args[1], ctx)?);
        Ok(Value::Text(out))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(AppendFunction));
}
