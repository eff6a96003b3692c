//! SUM function - sum of a column slice of the current table

use super::{Function, FunctionRegistry, FunctionSignature, name_argument};
use crate::error::{Error, Result};
use crate::execution::expression::evaluate;
use crate::parsing::ast::Expression;
use crate::types::{DataType, RowContext, Value};

pub struct SumFunction;

impl Function for SumFunction {
    fn signature(&self) -> &FunctionSignature {
        static SIGNATURE: FunctionSignature = FunctionSignature {
            name: "SUM",
            min_args: 3,
            max_args: Some(3),
            description: "Sum of a column from row start to finish inclusive",
        };
        &SIGNATURE
    }

    fn execute(&self, args: &[Expression], ctx: &RowContext) -> Result<Value> {
        let column_name = name_argument(&args[0], "column")?;
        let (idx, column) = ctx
            .table
            .get_column(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.into()))?;
        if column.data_type == DataType::Text {
            return Err(Error::TypeMismatch {
                expected: "an INT or REAL column".into(),
                found: format!("TEXT column '{}'", column_name),
            });
        }

        let start = index_argument(&args[1], ctx)?;
        let finish = index_argument(&args[2], ctx)?;
        // An empty or out-of-bounds range sums to zero.
        if start > finish || start < 0 || finish >= ctx.table.rows.len() as i64 {
            return Ok(Value::Real(0.0));
        }

        let total = ctx.table.rows[start as usize..=finish as usize]
            .iter()
            .filter_map(|row| row[idx].as_number())
            .sum();
        Ok(Value::Real(total))
    }
}

fn index_argument(arg: &Expression, ctx: &RowContext) -> Result<i64> {
    let value = evaluate(arg, ctx)?;
    value
        .as_number()
        .map(|n| n.round() as i64)
        .ok_or_else(|| Error::TypeMismatch {
            expected: "a numeric row index".into(),
            found: value.data_type().to_string(),
        })
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(SumFunction));
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
    fn test_sum_inclusive_range() {
        assert_eq!(eval("SUM(Amount, 0, 2)").unwrap(), Value::Real(60.0));
        assert_eq!(eval("SUM(Amount, 1, 2)").unwrap(), Value::Real(50.0));
        assert_eq!(eval("SUM(Amount, 1, 1)").unwrap(), Value::Real(20.0));
    }

    #[test]
    fn test_sum_degenerate_ranges() {
        assert_eq!(eval("SUM(Amount, 2, 1)").unwrap(), Value::Real(0.0));
        assert_eq!(eval("SUM(Amount, -1, 2)").unwrap(), Value::Real(0.0));
        assert_eq!(eval("SUM(Amount, 0, 3)").unwrap(), Value::Real(0.0));
    }

    #[test]
    fn test_sum_bounds_may_be_expressions() {
        assert_eq!(
            eval("SUM(Amount, 0, NUM_ROWS() - 1)").unwrap(),
            Value::Real(60.0)
        );
    }

    #[test]
    fn test_sum_fails_on_text_column() {
        assert!(eval("SUM(Name, 0, 2)").is_err());
        assert!(eval("SUM(Missing, 0, 2)").is_err());
    }
}
