//! Recursive translation of expression trees into Painless script text.

use crate::expression::{BinaryOperator, Expression, Number};
use crate::script::catalog::FunctionCatalog;
use crate::script::error::Result;
use crate::script::session::CompilationSession;
use log::debug;
use serde::Serialize;

/// Assignment of a compiled sub-expression to a generated symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub symbol: String,
    pub script: String,
}

impl Declaration {
    pub fn new(symbol: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            script: script.into(),
        }
    }

    pub fn to_source(&self) -> String {
        format!("def {} = {};", self.symbol, self.script)
    }
}

/// Output of compiling one node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledExpression {
    /// Symbol assignments introduced by this node and its children,
    /// children first
    pub declarations: Vec<Declaration>,
    /// Script text of this node
    pub script: String,
    /// Set when this node was itself assigned to a symbol
    pub symbol: Option<String>,
}

impl CompiledExpression {
    fn bare(script: String) -> Self {
        Self {
            declarations: Vec::new(),
            script,
            symbol: None,
        }
    }

    /// Text a parent substitutes for this node: the symbol when wrapped,
    /// the script text otherwise
    pub fn reference(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.script)
    }

    /// Assign this node's script text to a new symbol
    pub(crate) fn wrap(mut self, token: &str, session: &mut CompilationSession) -> Self {
        let symbol = session.next_symbol(token);
        self.declarations
            .push(Declaration::new(symbol.clone(), self.script.clone()));
        self.symbol = Some(symbol);
        self
    }
}

/// Walks expression trees against a function catalog
#[derive(Debug, Clone, Copy)]
pub struct ExpressionCompiler<'a> {
    catalog: &'a FunctionCatalog,
}

impl<'a> ExpressionCompiler<'a> {
    pub fn new(catalog: &'a FunctionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a FunctionCatalog {
        self.catalog
    }

    /// Compile `expr`. With `wrap` set, a function call or operator at the
    /// top is assigned to a symbol as well; nested calls and operators are
    /// always assigned. On failure the session is left untouched.
    pub fn compile(
        &self,
        expr: &Expression,
        session: &mut CompilationSession,
        wrap: bool,
    ) -> Result<CompiledExpression> {
        debug!("compiling expression {}", expr);
        session
            .transaction(|scratch| self.compile_node(expr, scratch, wrap))
            .inspect_err(|err| debug!("failed to compile {}: {}", expr, err))
    }

    pub(crate) fn compile_node(
        &self,
        expr: &Expression,
        session: &mut CompilationSession,
        wrap: bool,
    ) -> Result<CompiledExpression> {
        match expr {
            Expression::Literal(value) => Ok(CompiledExpression::bare(render_literal(value))),
            Expression::Field(name) => Ok(CompiledExpression::bare(render_field(name))),
            Expression::FunctionCall { name, args } => {
                self.compile_call(name, args, session, wrap)
            }
            Expression::BinaryOp { op, left, right } => {
                self.compile_binary_op(*op, left, right, session, wrap)
            }
        }
    }

    /// Compile a node used as an argument or operand of another node
    pub(crate) fn compile_operand(
        &self,
        expr: &Expression,
        session: &mut CompilationSession,
    ) -> Result<CompiledExpression> {
        self.compile_node(expr, session, expr.is_compound())
    }

    fn compile_call(
        &self,
        name: &str,
        args: &[Expression],
        session: &mut CompilationSession,
        wrap: bool,
    ) -> Result<CompiledExpression> {
        let entry = self.catalog.resolve_call(name, args.len())?;

        let mut declarations = Vec::new();
        let mut refs = Vec::with_capacity(args.len());
        for arg in args {
            let compiled = self.compile_operand(arg, session)?;
            refs.push(compiled.reference().to_string());
            declarations.extend(compiled.declarations);
        }

        let compiled = CompiledExpression {
            declarations,
            script: entry.template.render(&refs),
            symbol: None,
        };
        if wrap {
            Ok(compiled.wrap(&entry.token, session))
        } else {
            Ok(compiled)
        }
    }

    fn compile_binary_op(
        &self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
        session: &mut CompilationSession,
        wrap: bool,
    ) -> Result<CompiledExpression> {
        let entry = self.catalog.lookup_operator(op)?;

        let left = self.compile_operand(left, session)?;
        let right = self.compile_operand(right, session)?;
        let script = format!("{} {} {}", left.reference(), op.as_str(), right.reference());

        let mut declarations = left.declarations;
        declarations.extend(right.declarations);
        let compiled = CompiledExpression {
            declarations,
            script,
            symbol: None,
        };
        if wrap {
            Ok(compiled.wrap(entry.token, session))
        } else {
            Ok(compiled)
        }
    }
}

/// Render a numeric constant in Painless syntax.
///
/// Integers outside the `int` range carry an `L` suffix. Floats always carry
/// a decimal point or exponent so they never read back as integers.
pub fn render_literal(value: &Number) -> String {
    match *value {
        Number::Int(i64::MIN) => "Long.MIN_VALUE".to_string(),
        Number::Int(v) if i32::try_from(v).is_ok() => v.to_string(),
        Number::Int(v) => format!("{}L", v),
        Number::Float(v) if v.is_nan() => "Double.NaN".to_string(),
        Number::Float(v) if v == f64::INFINITY => "Double.POSITIVE_INFINITY".to_string(),
        Number::Float(v) if v == f64::NEG_INFINITY => "Double.NEGATIVE_INFINITY".to_string(),
        Number::Float(v) => format!("{:?}", v),
    }
}

/// Render doc-value access for a field
pub fn render_field(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("doc['{}'].value", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::error::CompileError;

    fn compile(expr: &Expression, wrap: bool) -> Result<CompiledExpression> {
        let mut session = CompilationSession::new();
        ExpressionCompiler::new(FunctionCatalog::global()).compile(expr, &mut session, wrap)
    }

    #[test]
    fn test_render_literal() {
        assert_eq!(render_literal(&Number::Int(5)), "5");
        assert_eq!(render_literal(&Number::Int(-3)), "-3");
        assert_eq!(render_literal(&Number::Int(i32::MAX as i64)), "2147483647");
        assert_eq!(render_literal(&Number::Int(i32::MIN as i64)), "-2147483648");
        assert_eq!(
            render_literal(&Number::Int(i32::MAX as i64 + 1)),
            "2147483648L"
        );
        assert_eq!(
            render_literal(&Number::Int(i32::MIN as i64 - 1)),
            "-2147483649L"
        );
        assert_eq!(render_literal(&Number::Int(i64::MAX)), "9223372036854775807L");
        assert_eq!(render_literal(&Number::Int(i64::MIN)), "Long.MIN_VALUE");
        assert_eq!(render_literal(&Number::Float(2.0)), "2.0");
        assert_eq!(render_literal(&Number::Float(0.25)), "0.25");
        assert_eq!(render_literal(&Number::Float(f64::NAN)), "Double.NaN");
        assert_eq!(
            render_literal(&Number::Float(f64::NEG_INFINITY)),
            "Double.NEGATIVE_INFINITY"
        );
    }

    #[test]
    fn test_long_literal_argument() {
        let expr = Expression::call("abs", vec![Expression::literal(5_000_000_000i64)]);
        let compiled = compile(&expr, false).unwrap();
        assert_eq!(compiled.script, "Math.abs(5000000000L)");
    }

    #[test]
    fn test_render_field() {
        assert_eq!(render_field("age"), "doc['age'].value");
        assert_eq!(render_field("address.city"), "doc['address.city'].value");
        assert_eq!(render_field("o'neil"), "doc['o\\'neil'].value");
    }

    #[test]
    fn test_leaves_are_never_wrapped() {
        let compiled = compile(&Expression::literal(5), true).unwrap();
        assert_eq!(compiled.script, "5");
        assert!(compiled.symbol.is_none());
        assert!(compiled.declarations.is_empty());

        let compiled = compile(&Expression::field("age"), true).unwrap();
        assert_eq!(compiled.reference(), "doc['age'].value");
        assert!(compiled.symbol.is_none());
    }

    #[test]
    fn test_call_unwrapped() {
        let expr = Expression::call("abs", vec![Expression::field("age")]);
        let compiled = compile(&expr, false).unwrap();
        assert_eq!(compiled.script, "Math.abs(doc['age'].value)");
        assert!(compiled.symbol.is_none());
        assert!(compiled.declarations.is_empty());
    }

    #[test]
    fn test_call_wrapped() {
        let expr = Expression::call("SQRT", vec![Expression::field("age")]);
        let compiled = compile(&expr, true).unwrap();
        assert_eq!(compiled.symbol.as_deref(), Some("sqrt_1"));
        assert_eq!(
            compiled.declarations,
            vec![Declaration::new("sqrt_1", "Math.sqrt(doc['age'].value)")]
        );
    }

    #[test]
    fn test_nested_call_referenced_by_symbol() {
        let expr = Expression::call(
            "sin",
            vec![Expression::call("radians", vec![Expression::field("age")])],
        );
        let compiled = compile(&expr, false).unwrap();
        assert_eq!(compiled.script, "Math.sin(radians_1)");
        assert_eq!(
            compiled.declarations,
            vec![Declaration::new(
                "radians_1",
                "Math.toRadians(doc['age'].value)"
            )]
        );
    }

    #[test]
    fn test_constant_inside_operator() {
        let expr = Expression::call(
            "atan",
            vec![Expression::div_expr(
                Expression::constant("PI"),
                Expression::literal(2),
            )],
        );
        let compiled = compile(&expr, false).unwrap();
        assert_eq!(compiled.script, "Math.atan(divide_2)");
        assert_eq!(
            compiled.declarations,
            vec![
                Declaration::new("PI_1", "Math.PI"),
                Declaration::new("divide_2", "PI_1 / 2"),
            ]
        );
    }

    #[test]
    fn test_depth_first_left_to_right_numbering() {
        let expr = Expression::call(
            "pow",
            vec![
                Expression::call("abs", vec![Expression::field("a")]),
                Expression::add_expr(
                    Expression::call("floor", vec![Expression::field("b")]),
                    Expression::literal(1),
                ),
            ],
        );
        let compiled = compile(&expr, true).unwrap();
        let symbols: Vec<&str> = compiled
            .declarations
            .iter()
            .map(|d| d.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["abs_1", "floor_2", "add_3", "pow_4"]);
        assert_eq!(compiled.script, "Math.pow(abs_1, add_3)");
        assert_eq!(compiled.declarations[2].script, "floor_2 + 1");
    }

    #[test]
    fn test_identical_subexpressions_get_distinct_symbols() {
        let pi = || Expression::constant("pi");
        let expr = Expression::mul_expr(pi(), pi());
        let compiled = compile(&expr, false).unwrap();
        assert_eq!(compiled.script, "PI_1 * PI_2");
        assert_eq!(compiled.declarations.len(), 2);
    }

    #[test]
    fn test_unknown_function_fails() {
        let expr = Expression::call("foo", vec![Expression::field("age")]);
        assert_eq!(
            compile(&expr, true),
            Err(CompileError::UnknownFunction {
                name: "foo".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_function_nested_fails_whole_tree() {
        let expr = Expression::call(
            "abs",
            vec![Expression::call("bogus", vec![Expression::literal(1)])],
        );
        assert!(matches!(
            compile(&expr, false),
            Err(CompileError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_arity_checked_before_arguments() {
        let expr = Expression::call(
            "atan2",
            vec![Expression::call("nope", vec![Expression::literal(1)])],
        );
        assert!(matches!(
            compile(&expr, false),
            Err(CompileError::ArityMismatch { actual: 1, .. })
        ));
    }

    #[test]
    fn test_unsupported_operator() {
        let expr = Expression::binary_op(
            BinaryOperator::Concat,
            Expression::field("a"),
            Expression::field("b"),
        );
        assert!(matches!(
            compile(&expr, true),
            Err(CompileError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_failure_consumes_no_symbols() {
        let compiler = ExpressionCompiler::new(FunctionCatalog::global());
        let mut session = CompilationSession::new();
        let bad = Expression::call(
            "abs",
            vec![Expression::add_expr(
                Expression::call("sqrt", vec![Expression::field("x")]),
                Expression::call("foo", Vec::new()),
            )],
        );
        assert!(compiler.compile(&bad, &mut session, true).is_err());

        let good = Expression::call("abs", vec![Expression::field("x")]);
        let compiled = compiler.compile(&good, &mut session, true).unwrap();
        assert_eq!(compiled.symbol.as_deref(), Some("abs_1"));
    }
}
