//! DELETE_ROWS command

use super::CommandOutput;
use super::expression::evaluate;
use crate::error::Result;
use crate::parsing::parse_expression;
use crate::registry::Registry;
use crate::types::{Clock, RowContext};

/// Deletes every row whose expression evaluates to a nonzero number. The
/// safe default keeps the row: an evaluator error or a TEXT result never
/// deletes anything.
pub fn delete_rows(
    registry: &mut Registry,
    table_name: &str,
    expression: &str,
    clock: &dyn Clock,
) -> Result<CommandOutput> {
    let expr = parse_expression(expression)?;
    let table = registry.require(table_name)?;

    // Phase 1: decide per row against an immutable borrow.
    let keep: Vec<bool> = {
        let mut ctx = RowContext::new(registry, table, 0, clock);
        (0..table.rows.len())
            .map(|i| {
                ctx.row = i;
                match evaluate(&expr, &ctx) {
                    Ok(value) => match value.as_number() {
                        Some(n) => n == 0.0,
                        None => true,
                    },
                    Err(_) => true,
                }
            })
            .collect()
    };

    // Phase 2: drop the condemned rows.
    let table = registry.require_mut(table_name)?;
    let mut i = 0;
    table.rows.retain(|_| {
        let kept = keep[i];
        i += 1;
        kept
    });
    Ok(CommandOutput::table(table.clone()))
}
