pub mod config;
pub mod expression;
pub mod script;

pub use config::CompilerConfig;
pub use expression::{BinaryOperator, Comparison, Expression, Number};
pub use script::{CompilationSession, CompileError, ScriptCompiler, ScriptField, ScriptFilter};
