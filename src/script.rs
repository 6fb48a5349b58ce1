//! Translation of scalar SQL expressions into Painless scripts.
//!
//! This module provides:
//! - The function/operator catalog
//! - Session-scoped symbol generation
//! - The recursive expression compiler
//! - WHERE-clause script filters and SELECT-clause script fields

pub mod catalog;
pub mod compiler;
pub mod error;
pub mod predicate;
pub mod projection;
pub mod session;
pub mod symbol;

pub use catalog::{Arity, CallTemplate, FunctionCatalog, FunctionEntry, OperatorEntry};
pub use compiler::{CompiledExpression, Declaration, ExpressionCompiler};
pub use error::{CompileError, Result};
pub use predicate::{PredicateAssembler, ScriptFilter};
pub use projection::{ProjectionEmitter, ScriptField};
pub use session::CompilationSession;
pub use symbol::SymbolGenerator;

use crate::config::CompilerConfig;
use crate::expression::{Comparison, Expression};

/// Entry point used by the query layer: one per process or per request,
/// with a fresh [`CompilationSession`] for every query.
#[derive(Debug, Clone)]
pub struct ScriptCompiler<'a> {
    config: CompilerConfig,
    catalog: &'a FunctionCatalog,
}

impl ScriptCompiler<'static> {
    /// Compiler backed by the built-in catalog
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_catalog(config, FunctionCatalog::global())
    }
}

impl Default for ScriptCompiler<'static> {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl<'a> ScriptCompiler<'a> {
    pub fn with_catalog(config: CompilerConfig, catalog: &'a FunctionCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Start the compilation session for one query
    pub fn session(&self) -> CompilationSession {
        CompilationSession::with_baseline(self.config.symbol_baseline)
    }

    pub fn compile_expression(
        &self,
        expr: &Expression,
        session: &mut CompilationSession,
        wrap: bool,
    ) -> Result<CompiledExpression> {
        self.expression_compiler().compile(expr, session, wrap)
    }

    /// Compile a WHERE-clause comparison
    pub fn compile_filter(
        &self,
        comparison: &Comparison,
        session: &mut CompilationSession,
    ) -> Result<ScriptFilter> {
        PredicateAssembler::new(self.expression_compiler())
            .with_wrap_bare_operands(self.config.wrap_bare_operands)
            .assemble(comparison, session)
    }

    /// Compile a SELECT-clause expression
    pub fn compile_field(
        &self,
        expr: &Expression,
        name: Option<&str>,
        session: &mut CompilationSession,
    ) -> Result<ScriptField> {
        ProjectionEmitter::new(self.expression_compiler()).emit(expr, name, session)
    }

    /// Script query clause for `filter` in the configured script language
    pub fn filter_query_json(&self, filter: &ScriptFilter) -> serde_json::Value {
        filter.to_query_json(&self.config.script_lang)
    }

    /// `script_fields` entry for `field` in the configured script language
    pub fn field_query_json(&self, field: &ScriptField) -> serde_json::Value {
        field.to_query_json(&self.config.script_lang)
    }

    fn expression_compiler(&self) -> ExpressionCompiler<'a> {
        ExpressionCompiler::new(self.catalog)
    }
}
