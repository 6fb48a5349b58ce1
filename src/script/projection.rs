//! Computed output fields for SELECT-clause expressions.

use crate::expression::Expression;
use crate::script::compiler::{Declaration, ExpressionCompiler};
use crate::script::error::Result;
use crate::script::session::CompilationSession;
use log::debug;
use serde::Serialize;
use serde_json::json;

/// Script evaluating to a projected value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptField {
    /// Output field name
    pub name: String,
    /// Intermediate symbol assignments in declaration order
    pub declarations: Vec<Declaration>,
    /// Script text of the top-level expression
    pub expression: String,
}

impl ScriptField {
    /// Standalone script: every declaration, then the top-level expression
    pub fn source(&self) -> String {
        let mut source = String::new();
        for declaration in &self.declarations {
            source.push_str(&declaration.to_source());
            source.push(' ');
        }
        source.push_str(&self.expression);
        source
    }

    /// Entry for the `script_fields` section of a search request
    pub fn to_query_json(&self, lang: &str) -> serde_json::Value {
        let mut fields = serde_json::Map::new();
        fields.insert(
            self.name.clone(),
            json!({
                "script": {
                    "source": self.source(),
                    "lang": lang,
                }
            }),
        );
        serde_json::Value::Object(fields)
    }
}

/// Turns SELECT-clause expressions into [`ScriptField`]s
#[derive(Debug, Clone, Copy)]
pub struct ProjectionEmitter<'a> {
    compiler: ExpressionCompiler<'a>,
}

impl<'a> ProjectionEmitter<'a> {
    pub fn new(compiler: ExpressionCompiler<'a>) -> Self {
        Self { compiler }
    }

    /// Compile `expr` without assigning the outermost node to a symbol.
    /// `name` defaults to the expression's SQL text.
    pub fn emit(
        &self,
        expr: &Expression,
        name: Option<&str>,
        session: &mut CompilationSession,
    ) -> Result<ScriptField> {
        let compiled = self.compiler.compile(expr, session, false)?;
        let name = name.map_or_else(|| expr.to_string(), str::to_string);
        debug!(
            "emitted script field {} with {} declarations",
            name,
            compiled.declarations.len()
        );
        Ok(ScriptField {
            name,
            declarations: compiled.declarations,
            expression: compiled.script,
        })
    }
}
