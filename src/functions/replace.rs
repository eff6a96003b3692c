//! REPLACE function - global regex replace over a column of the current row

use super::{Function, FunctionRegistry, FunctionSignature, name_argument, text_argument};
use crate::error::{Error, Result};
use crate::parsing::ast::Expression;
use crate::types::{RowContext, Value};
use regex::Regex;

pub struct ReplaceFunction;

impl Function for ReplaceFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "REPLACE",
            min_args: 3,
            max_args: Some(3),
            description: "Global regex replace in a column of the current row",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        let column = name_argument(&args[0], "column")?;
        let subject = ctx
            .field(column)
            .ok_or_else(|| Error::ColumnNotFound(column.into()))?
            .to_text();
        let pattern = text_argument(&args[1], ctx)?;
        let template = text_argument(&args[2], ctx)?;

        let regex = Regex::new(&pattern)
            .map_err(|e| Error::ExpressionError(format!("invalid pattern: {}", e)))?;
        // The template may reference capture groups as $0..$9.
        Ok(Value::text(
            regex.replace_all(&subject, template.as_str()).into_owned(),
        ))
    }
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(ReplaceFunction));
}

#[cfg(test)]
mod tests {
    use crate::execution::expression::evaluate;
    use crate::functions::testing;
    use crate::parsing::parse_expression;
    use crate::types::{RowContext, Value};

    fn eval(input: &str) -> crate::error::Result<Value> {
        let registry = testing::registry();
        let clock = testing::clock();
        let ctx = RowContext::new(&registry, registry.get("t").unwrap(), 0, &clock);
        evaluate(&parse_expression(input).unwrap(), &ctx)
    }

    #[test]
    fn test_replace_is_global() {
        // Row 0 Name is 'ada'
        assert_eq!(eval("REPLACE(Name, 'a', 'o')").unwrap(), Value::text("odo"));
    }

    #[test]
    fn test_replace_capture_groups() {
        assert_eq!(
            eval("REPLACE(Name, '(a)(d)', '$2$1')").unwrap(),
            Value::text("daa")
        );
        assert_eq!(
            eval("REPLACE(Name, 'd', '[$0]')").unwrap(),
            Value::text("a[d]a")
        );
    }

    #[test]
    fn test_replace_errors() {
        assert!(eval("REPLACE(Missing, 'a', 'b')").is_err());
        assert!(eval("REPLACE(Name, '(', 'b')").is_err());
    }
}
