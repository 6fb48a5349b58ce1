//! Expression AST definitions.

use crate::expression::operator::BinaryOperator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric constant in an expression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl From<i64> for Number {
    fn from(val: i64) -> Self {
        Number::Int(val)
    }
}

impl From<i32> for Number {
    fn from(val: i32) -> Self {
        Number::Int(val as i64)
    }
}

impl From<f64> for Number {
    fn from(val: f64) -> Self {
        Number::Float(val)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expression {
    /// Numeric constant
    Literal(Number),

    /// Reference to a document field by its unqualified name
    Field(String),

    /// Function call; zero arguments denote a named constant such as `PI()`
    FunctionCall { name: String, args: Vec<Expression> },

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Number>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a field reference expression
    pub fn field(name: impl Into<String>) -> Self {
        Expression::Field(name.into())
    }

    /// Create a function call expression
    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    /// Create a zero-argument function call, e.g. `PI()`
    pub fn constant(name: impl Into<String>) -> Self {
        Self::call(name, Vec::new())
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create an addition expression
    pub fn add_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Add, left, right)
    }

    /// Create a subtraction expression
    pub fn sub_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Sub, left, right)
    }

    /// Create a multiplication expression
    pub fn mul_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Mul, left, right)
    }

    /// Create a division expression
    pub fn div_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Div, left, right)
    }

    /// Create a modulo expression
    pub fn mod_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Mod, left, right)
    }

    /// Whether compiling this node as an operand produces a named symbol
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Expression::FunctionCall { .. } | Expression::BinaryOp { .. }
        )
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Field(name) => f.write_str(name),
            Expression::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expression::BinaryOp { op, left, right } => {
                fmt_operand(f, left)?;
                write!(f, " {} ", op)?;
                fmt_operand(f, right)
            }
        }
    }
}

fn fmt_operand(f: &mut fmt::Formatter<'_>, expr: &Expression) -> fmt::Result {
    if matches!(expr, Expression::BinaryOp { .. }) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// A WHERE-clause comparison: `left <comparator> right`.
///
/// The comparator is carried as written in the query and is never interpreted
/// by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub left: Expression,
    pub comparator: String,
    pub right: Expression,
}

impl Comparison {
    pub fn new(left: Expression, comparator: impl Into<String>, right: Expression) -> Self {
        Self {
            left,
            comparator: comparator.into(),
            right,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.comparator, self.right)
    }
}
