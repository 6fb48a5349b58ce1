//! Scalar expression model handed over by the SQL parser.
//!
//! This module provides:
//! - Expression tree representation (literals, fields, calls, operators)
//! - WHERE-clause comparisons
//! - Builder helpers for assembling trees in code

pub mod expr;
pub mod operator;

pub use expr::{Comparison, Expression, Number};
pub use operator::BinaryOperator;
