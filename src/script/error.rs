//! Error types for script compilation.

use crate::script::catalog::Arity;
use thiserror::Error;

/// Errors that abort compilation of an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Function name has no catalog entry
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// Wrong number of function arguments
    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        function: String,
        expected: Arity,
        actual: usize,
    },

    /// Binary operator has no script translation
    #[error("Unsupported operator: {operator}")]
    UnsupportedOperator { operator: String },

    /// Compiler configuration could not be read
    #[error("Invalid compiler configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for compilation
pub type Result<T> = std::result::Result<T, CompileError>;
