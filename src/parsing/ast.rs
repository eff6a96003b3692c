//! Expression AST

use std::fmt;

/// An expression, evaluated against a row context. Can be nested.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value.
    Literal(Literal),
    /// A column reference, looked up in the current row.
    Field(String),
    /// A column reference offset from the current row: `col[expr]`.
    IndexedField(String, Box<Expression>),
    /// A function call (name and unevaluated arguments).
    Function(String, Vec<Expression>),
    /// `cond ? then : otherwise`.
    Conditional {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    /// An operator application.
    Operator(Operator),
}

/// Expression literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
}

/// Expression operators. Each child is boxed since the tree is recursive.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    And(Box<Expression>, Box<Expression>), // a && b
    Or(Box<Expression>, Box<Expression>),  // a || b
    Not(Box<Expression>),                  // !a

    Equal(Box<Expression>, Box<Expression>),       // a = b
    NotEqual(Box<Expression>, Box<Expression>),    // a != b
    LessThan(Box<Expression>, Box<Expression>),    // a < b
    GreaterThan(Box<Expression>, Box<Expression>), // a > b

    Add(Box<Expression>, Box<Expression>),          // a + b
    Subtract(Box<Expression>, Box<Expression>),     // a - b
    Multiply(Box<Expression>, Box<Expression>),     // a * b
    Divide(Box<Expression>, Box<Expression>),       // a / b
    Exponentiate(Box<Expression>, Box<Expression>), // a ^ b
    Negate(Box<Expression>),                        // -a
}

impl Operator {
    /// True for the four comparison operators, which are non-associative.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Equal(..)
                | Operator::NotEqual(..)
                | Operator::LessThan(..)
                | Operator::GreaterThan(..)
        )
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl From<Operator> for Expression {
    fn from(operator: Operator) -> Self {
        Expression::Operator(operator)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Literal::Integer(n)) => write!(f, "{}", n),
            Expression::Literal(Literal::Float(n)) => write!(f, "{}", n),
            Expression::Literal(Literal::String(s)) => write!(f, "'{}'", s),
            Expression::Field(name) => write!(f, "{}", name),
            Expression::IndexedField(name, offset) => write!(f, "{}[{}]", name, offset),
            Expression::Function(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expression::Conditional {
                condition,
                then,
                otherwise,
            } => write!(f, "({} ? {} : {})", condition, then, otherwise),
            Expression::Operator(op) => {
                use Operator::*;
                match op {
                    And(l, r) => write!(f, "({} && {})", l, r),
                    Or(l, r) => write!(f, "({} || {})", l, r),
                    Not(e) => write!(f, "(!{})", e),
                    Equal(l, r) => write!(f, "({} = {})", l, r),
                    NotEqual(l, r) => write!(f, "({} != {})", l, r),
                    LessThan(l, r) => write!(f, "({} < {})", l, r),
                    GreaterThan(l, r) => write!(f, "({} > {})", l, r),
                    Add(l, r) => write!(f, "({} + {})", l, r),
                    Subtract(l, r) => write!(f, "({} - {})", l, r),
                    Multiply(l, r) => write!(f, "({} * {})", l, r),
                    Divide(l, r) => write!(f, "({} / {})", l, r),
                    Exponentiate(l, r) => write!(f, "({} ^ {})", l, r),
                    Negate(e) => write!(f, "(-{})", e),
                }
            }
        }
    }
}
