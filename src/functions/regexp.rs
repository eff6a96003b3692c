//! REGEXP function - first regex match

use super::{Function, FunctionRegistry, FunctionSignature, column_or_value, text_argument};
use crate::error::Result;
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};
use regex::Regex;

pub struct RegexpFunction;

impl Function for RegexpFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "REGEXP",
            min_args: 2,
            max_args: Some(2),
            description: "First match of the pattern in the subject",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        let pattern = text_argument(&args[0], ctx)?;
        // The subject may be a bare column name.
        let subject = column_or_value(&args[1], ctx)?.to_text();

        // An invalid pattern or no match both resolve to empty text.
        let Ok(regex) = Regex::new(&pattern) else {
            return Ok(Value::text(""));
        };
        Ok(Value::text(
            regex.find(&subject).map(|m| m.as_str()).unwrap_or(""),
        ))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(RegexpFunction));
}
