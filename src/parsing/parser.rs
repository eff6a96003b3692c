//! Expression parser
//!
//! Parses token streams into an expression AST using the precedence climbing
//! algorithm: the left-hand side (with any prefix operators) is parsed
//! recursively, then infix operators are greedily consumed as long as their
//! precedence is at least the minimum carried down the recursion. See
//! <https://en.wikipedia.org/wiki/Operator-precedence_parser#Precedence_climbing_method>
//!
//! The precedence ladder, from loosest to tightest binding:
//!
//! * 1: `? :` (right-associative)
//! * 2: `||`
//! * 3: `&&`
//! * 4: `!` (prefix)
//! * 5: `=`, `!=`, `<`, `>` (non-associative: one comparison per chain)
//! * 6: `+`, `-`
//! * 7: `*`, `/`
//! * 8: `^` (right-associative)
//! * 9: `-` (prefix)
//!
//! Left-associative operators get a +1 to their precedence when recursing
//! into their right-hand side, so they bind tighter to their left operand.

use std::iter::Peekable;
use std::ops::Add;

use super::ast::{Expression, Literal, Operator};
use super::lexer::{Lexer, Token};
use crate::error::{Error, Result};

pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl Parser<'_> {
    /// Parses the input string into an expression AST. The entire string
    /// must form a single expression.
    pub fn parse(input: &str) -> Result<Expression> {
        let mut parser = Parser {
            lexer: Lexer::new(input).peekable(),
        };
        let expression = parser.parse_expression()?;
        if let Some(token) = parser.lexer.next().transpose()? {
            return Err(Error::ExpressionError(format!(
                "unexpected token '{}'",
                token
            )));
        }
        Ok(expression)
    }

    /// Fetches the next token, or errors if none is found.
    fn next(&mut self) -> Result<Token> {
        self.lexer
            .next()
            .transpose()?
            .ok_or_else(|| Error::ExpressionError("unexpected end of expression".into()))
    }

    /// Returns the next token if it satisfies the predicate.
    fn next_if(&mut self, predicate: impl Fn(&Token) -> bool) -> Option<Token> {
        self.peek().ok()?.filter(|t| predicate(t))?;
        self.next().ok()
    }

    /// Passes the next token through the closure, consuming it if the
    /// closure returns Some.
    fn next_if_map<T>(&mut self, f: impl Fn(&Token) -> Option<T>) -> Option<T> {
        self.peek().ok()?.map(f)?.inspect(|_| drop(self.next()))
    }

    /// Consumes the next token if it is the given token, returning true.
    fn next_is(&mut self, token: Token) -> bool {
        self.next_if(|t| t == &token).is_some()
    }

    /// Consumes the next token if it's the expected token, or errors.
    fn expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::ExpressionError(format!(
                "expected '{}', found '{}'",
                expect, token
            )));
        }
        Ok(())
    }

    /// Peeks the next token if any, transposed for convenience.
    fn peek(&mut self) -> Result<Option<&Token>> {
        self.lexer
            .peek()
            .map(|r| r.as_ref().map_err(|err| err.clone()))
            .transpose()
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_expression_at(0)
    }

    /// Parses an expression at the given minimum precedence.
    fn parse_expression_at(&mut self, min_precedence: Precedence) -> Result<Expression> {
        let mut lhs = if let Some(prefix) = self.parse_prefix_operator_at(min_precedence) {
            // Prefix operators are right-associative by definition.
            let rhs = self.parse_expression_at(prefix.precedence())?;
            prefix.into_expression(rhs)
        } else {
            self.parse_expression_atom()?
        };

        // Comparisons are non-associative: at most one per climb invocation.
        // A parenthesized operand starts a fresh invocation, so `(a<b) < c`
        // is still fine.
        let mut compared = false;
        loop {
            // The conditional is the loosest operator and needs its own
            // handling, since the branch between `?` and `:` is a full
            // expression of its own.
            if CONDITIONAL_PRECEDENCE >= min_precedence && self.next_is(Token::Question) {
                let then = self.parse_expression()?;
                self.expect(Token::Colon)?;
                // Right-associative: recurse at the same precedence.
                let otherwise = self.parse_expression_at(CONDITIONAL_PRECEDENCE)?;
                lhs = Expression::Conditional {
                    condition: Box::new(lhs),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                };
                continue;
            }

            let Some(infix) = self.parse_infix_operator_at(min_precedence) else {
                break;
            };
            if infix.is_comparison() {
                if compared {
                    return Err(Error::ExpressionError(
                        "comparisons cannot be chained".into(),
                    ));
                }
                compared = true;
            }
            let next_precedence = infix.precedence() + infix.associativity();
            let rhs = self.parse_expression_at(next_precedence)?;
            lhs = infix.into_expression(lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parses an expression atom: a literal, a field or indexed field
    /// reference, a function call, or a parenthesized expression.
    fn parse_expression_atom(&mut self) -> Result<Expression> {
        Ok(match self.next()? {
            Token::Number(n) if !n.contains('.') => Literal::Integer(
                n.parse()
                    .map_err(|e| Error::ExpressionError(format!("invalid integer: {}", e)))?,
            )
            .into(),
            Token::Number(n) => Literal::Float(
                n.parse()
                    .map_err(|e| Error::ExpressionError(format!("invalid number: {}", e)))?,
            )
            .into(),
            Token::String(s) => Literal::String(s).into(),

            // Function call.
            Token::Ident(name) if self.next_is(Token::OpenParen) => {
                let mut args = Vec::new();
                while !self.next_is(Token::CloseParen) {
                    if !args.is_empty() {
                        self.expect(Token::Comma)?;
                    }
                    args.push(self.parse_expression()?);
                }
                Expression::Function(name, args)
            }

            // Indexed field reference: col[expr].
            Token::Ident(name) if self.next_is(Token::OpenBracket) => {
                let offset = self.parse_expression()?;
                self.expect(Token::CloseBracket)?;
                Expression::IndexedField(name, Box::new(offset))
            }

            Token::Ident(name) => Expression::Field(name),

            // Parenthesized expression.
            Token::OpenParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::CloseParen)?;
                expr
            }

            token => {
                return Err(Error::ExpressionError(format!(
                    "expected expression, found '{}'",
                    token
                )));
            }
        })
    }

    /// Parses a prefix operator, if there is one and its precedence is at
    /// least min_precedence.
    fn parse_prefix_operator_at(&mut self, min_precedence: Precedence) -> Option<PrefixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Exclamation => PrefixOperator::Not,
                Token::Minus => PrefixOperator::Minus,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }

    /// Parses an infix operator, if there is one and its precedence is at
    /// least min_precedence.
    fn parse_infix_operator_at(&mut self, min_precedence: Precedence) -> Option<InfixOperator> {
        self.next_if_map(|token| {
            let operator = match token {
                Token::Amp2 => InfixOperator::And,
                Token::Asterisk => InfixOperator::Multiply,
                Token::Caret => InfixOperator::Exponentiate,
                Token::Equal => InfixOperator::Equal,
                Token::GreaterThan => InfixOperator::GreaterThan,
                Token::LessThan => InfixOperator::LessThan,
                Token::Minus => InfixOperator::Subtract,
                Token::NotEqual => InfixOperator::NotEqual,
                Token::Pipe2 => InfixOperator::Or,
                Token::Plus => InfixOperator::Add,
                Token::Slash => InfixOperator::Divide,
                _ => return None,
            };
            Some(operator).filter(|op| op.precedence() >= min_precedence)
        })
    }
}

/// Operator precedence.
type Precedence = u8;

/// The conditional `? :` binds loosest of all operators.
const CONDITIONAL_PRECEDENCE: Precedence = 1;

/// Operator associativity.
enum Associativity {
    Left,
    Right,
}

impl Add<Associativity> for Precedence {
    type Output = Self;

    fn add(self, rhs: Associativity) -> Self {
        // Left-associative operators bind tighter to their left-hand side.
        self + match rhs {
            Associativity::Left => 1,
            Associativity::Right => 0,
        }
    }
}

/// Prefix operators.
enum PrefixOperator {
    Not,   // !a
    Minus, // -a
}

impl PrefixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Not => 4,
            Self::Minus => 9,
        }
    }

    fn into_expression(self, rhs: Expression) -> Expression {
        let rhs = Box::new(rhs);
        match self {
            Self::Not => Operator::Not(rhs).into(),
            Self::Minus => Operator::Negate(rhs).into(),
        }
    }
}

/// Infix operators.
enum InfixOperator {
    Add,          // a + b
    And,          // a && b
    Divide,       // a / b
    Equal,        // a = b
    Exponentiate, // a ^ b
    GreaterThan,  // a > b
    LessThan,     // a < b
    Multiply,     // a * b
    NotEqual,     // a != b
    Or,           // a || b
    Subtract,     // a - b
}

impl InfixOperator {
    fn precedence(&self) -> Precedence {
        match self {
            Self::Or => 2,
            Self::And => 3,
            Self::Equal | Self::NotEqual | Self::LessThan | Self::GreaterThan => 5,
            Self::Add | Self::Subtract => 6,
            Self::Multiply | Self::Divide => 7,
            Self::Exponentiate => 8,
        }
    }

    fn associativity(&self) -> Associativity {
        match self {
            Self::Exponentiate => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal | Self::NotEqual | Self::LessThan | Self::GreaterThan
        )
    }

    fn into_expression(self, lhs: Expression, rhs: Expression) -> Expression {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match self {
            Self::Add => Operator::Add(lhs, rhs).into(),
            Self::And => Operator::And(lhs, rhs).into(),
            Self::Divide => Operator::Divide(lhs, rhs).into(),
            Self::Equal => Operator::Equal(lhs, rhs).into(),
            Self::Exponentiate => Operator::Exponentiate(lhs, rhs).into(),
            Self::GreaterThan => Operator::GreaterThan(lhs, rhs).into(),
            Self::LessThan => Operator::LessThan(lhs, rhs).into(),
            Self::Multiply => Operator::Multiply(lhs, rhs).into(),
            Self::NotEqual => Operator::NotEqual(lhs, rhs).into(),
            Self::Or => Operator::Or(lhs, rhs).into(),
            Self::Subtract => Operator::Subtract(lhs, rhs).into(),
        }
    }
}
