//! Assembly of WHERE-clause comparisons into script filters.

use crate::expression::{Comparison, Expression};
use crate::script::compiler::{Declaration, ExpressionCompiler};
use crate::script::error::Result;
use crate::script::session::CompilationSession;
use log::debug;
use serde::Serialize;
use serde_json::json;

/// Symbol token for a bare literal declared on its own
const LITERAL_TOKEN: &str = "value";
/// Symbol token for a bare field reference declared on its own
const FIELD_TOKEN: &str = "field";

/// Filter predicate ready for the search engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptFilter {
    /// Intermediate symbol assignments in declaration order
    pub declarations: Vec<Declaration>,
    /// `<symbol> <comparator> <rhs>`
    pub condition: String,
}

impl ScriptFilter {
    /// Standalone script: every declaration, then `return <condition>;`
    pub fn source(&self) -> String {
        let mut source = String::new();
        for declaration in &self.declarations {
            source.push_str(&declaration.to_source());
            source.push(' ');
        }
        source.push_str("return ");
        source.push_str(&self.condition);
        source.push(';');
        source
    }

    /// Script query clause as understood by the engine's query DSL
    pub fn to_query_json(&self, lang: &str) -> serde_json::Value {
        json!({
            "script": {
                "script": {
                    "source": self.source(),
                    "lang": lang,
                }
            }
        })
    }
}

/// Turns comparisons into [`ScriptFilter`]s
#[derive(Debug, Clone, Copy)]
pub struct PredicateAssembler<'a> {
    compiler: ExpressionCompiler<'a>,
    wrap_bare_operands: bool,
}

impl<'a> PredicateAssembler<'a> {
    pub fn new(compiler: ExpressionCompiler<'a>) -> Self {
        Self {
            compiler,
            wrap_bare_operands: false,
        }
    }

    pub fn with_wrap_bare_operands(mut self, wrap: bool) -> Self {
        self.wrap_bare_operands = wrap;
        self
    }

    /// Compile `comparison`. The left operand is always referenced by a
    /// symbol unless it is a bare literal or field and bare wrapping is off.
    /// The comparator is copied into the condition as written.
    pub fn assemble(
        &self,
        comparison: &Comparison,
        session: &mut CompilationSession,
    ) -> Result<ScriptFilter> {
        debug!("assembling script filter for {}", comparison);
        session
            .transaction(|scratch| self.assemble_in(comparison, scratch))
            .inspect_err(|err| debug!("failed to assemble {}: {}", comparison, err))
    }

    fn assemble_in(
        &self,
        comparison: &Comparison,
        session: &mut CompilationSession,
    ) -> Result<ScriptFilter> {
        let mut left = self.compiler.compile_node(&comparison.left, session, true)?;
        if left.symbol.is_none() && self.wrap_bare_operands {
            let token = match comparison.left {
                Expression::Field(_) => FIELD_TOKEN,
                _ => LITERAL_TOKEN,
            };
            left = left.wrap(token, session);
        }
        let right = self.compiler.compile_operand(&comparison.right, session)?;

        let condition = format!(
            "{} {} {}",
            left.reference(),
            comparison.comparator,
            right.reference()
        );
        let mut declarations = left.declarations;
        declarations.extend(right.declarations);

        Ok(ScriptFilter {
            declarations,
            condition,
        })
    }
}
