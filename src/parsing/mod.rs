//! The augmented expression language
//!
//! This module turns expression strings into an AST: the lexer splits the
//! input into tokens and the parser applies the precedence ladder. It only
//! ensures the expression is well-formed; whether a referenced column or
//! function exists is the evaluator's job.

pub mod ast;
mod lexer;
mod parser;

pub use ast::{Expression, Literal, Operator};
pub use lexer::{Lexer, Token};
pub use parser::Parser;

use crate::error::Result;

/// Parse an expression string into an AST.
pub fn parse_expression(input: &str) -> Result<Expression> {
    Parser::parse(input)
}
