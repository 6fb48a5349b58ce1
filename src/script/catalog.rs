//! Catalog of SQL functions and operators with a script translation.
//!
//! Names are matched case-insensitively: entries are stored under their
//! lower-cased SQL name and every lookup lower-cases the requested name.

use crate::expression::BinaryOperator;
use crate::script::error::{CompileError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Renders a call from already-compiled argument references
pub type RenderFn = fn(&[String]) -> String;

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Inclusive bounds
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

/// How a function call is written in script text
#[derive(Clone, Copy)]
pub enum CallTemplate {
    /// Zero-argument constant, e.g. `Math.PI`
    Constant(&'static str),
    /// Plain call `<target>(<arg0>, <arg1>, ...)`
    Call(&'static str),
    /// Anything that is not a single library call
    Render(RenderFn),
}

impl CallTemplate {
    pub fn render(&self, args: &[String]) -> String {
        match self {
            CallTemplate::Constant(expr) => (*expr).to_string(),
            CallTemplate::Call(target) => format!("{}({})", target, args.join(", ")),
            CallTemplate::Render(render) => render(args),
        }
    }
}

impl fmt::Debug for CallTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTemplate::Constant(expr) => f.debug_tuple("Constant").field(expr).finish(),
            CallTemplate::Call(target) => f.debug_tuple("Call").field(target).finish(),
            CallTemplate::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// Catalog entry for one SQL function
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    /// Lower-cased SQL name
    pub name: String,
    /// Prefix for generated symbol names
    pub token: String,
    pub arity: Arity,
    pub template: CallTemplate,
}

impl FunctionEntry {
    /// Single library call, symbol token is the SQL name
    pub fn call(name: &str, target: &'static str, arity: Arity) -> Self {
        let name = name.to_lowercase();
        Self {
            token: name.clone(),
            name,
            arity,
            template: CallTemplate::Call(target),
        }
    }

    /// Zero-argument constant
    pub fn constant(name: &str, expression: &'static str) -> Self {
        let name = name.to_lowercase();
        Self {
            token: name.clone(),
            name,
            arity: Arity::Exact(0),
            template: CallTemplate::Constant(expression),
        }
    }

    pub fn render(name: &str, arity: Arity, render: RenderFn) -> Self {
        let name = name.to_lowercase();
        Self {
            token: name.clone(),
            name,
            arity,
            template: CallTemplate::Render(render),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

/// Catalog entry for a binary operator.
///
/// The operator itself is written verbatim; the entry only supplies the
/// symbol token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorEntry {
    pub operator: BinaryOperator,
    pub token: &'static str,
}

/// Registry of all translatable functions and operators
#[derive(Debug, Clone)]
pub struct FunctionCatalog {
    functions: HashMap<String, FunctionEntry>,
    operators: HashMap<BinaryOperator, OperatorEntry>,
}

/// One-argument functions that map directly onto a `Math` method
const UNARY_MATH: [(&str, &str); 18] = [
    ("abs", "Math.abs"),
    ("acos", "Math.acos"),
    ("asin", "Math.asin"),
    ("atan", "Math.atan"),
    ("cbrt", "Math.cbrt"),
    ("ceil", "Math.ceil"),
    ("cos", "Math.cos"),
    ("cosh", "Math.cosh"),
    ("exp", "Math.exp"),
    ("expm1", "Math.expm1"),
    ("floor", "Math.floor"),
    ("log10", "Math.log10"),
    ("rint", "Math.rint"),
    ("sin", "Math.sin"),
    ("sinh", "Math.sinh"),
    ("sqrt", "Math.sqrt"),
    ("tan", "Math.tan"),
    ("tanh", "Math.tanh"),
];

static GLOBAL_CATALOG: OnceLock<FunctionCatalog> = OnceLock::new();

impl FunctionCatalog {
    /// Create a catalog with all built-in math functions and operators
    pub fn new() -> Self {
        let mut catalog = Self::empty();

        for (name, target) in UNARY_MATH {
            catalog.register(FunctionEntry::call(name, target, Arity::Exact(1)));
        }

        catalog.register(FunctionEntry::call("degrees", "Math.toDegrees", Arity::Exact(1)));
        catalog.register(FunctionEntry::call("radians", "Math.toRadians", Arity::Exact(1)));
        catalog.register(FunctionEntry::call("ln", "Math.log", Arity::Exact(1)));
        catalog.register(FunctionEntry::call("round", "Math.round", Arity::Exact(1)));
        catalog.register(FunctionEntry::call("sign", "Math.signum", Arity::Exact(1)));
        catalog.register(FunctionEntry::call("signum", "Math.signum", Arity::Exact(1)));
        catalog.register(FunctionEntry::call("atan2", "Math.atan2", Arity::Exact(2)));
        catalog.register(FunctionEntry::call("pow", "Math.pow", Arity::Exact(2)));
        catalog.register(FunctionEntry::call("power", "Math.pow", Arity::Exact(2)));

        catalog.register(FunctionEntry::render("log", Arity::Range(1, 2), render_log));
        catalog.register(FunctionEntry::render("log2", Arity::Exact(1), render_log2));
        catalog.register(FunctionEntry::render("cot", Arity::Exact(1), render_cot));

        catalog.register(FunctionEntry::constant("pi", "Math.PI").with_token("PI"));
        catalog.register(FunctionEntry::constant("e", "Math.E").with_token("E"));

        catalog.register_operator(BinaryOperator::Add, "add");
        catalog.register_operator(BinaryOperator::Sub, "subtract");
        catalog.register_operator(BinaryOperator::Mul, "multiply");
        catalog.register_operator(BinaryOperator::Div, "divide");
        catalog.register_operator(BinaryOperator::Mod, "modulus");

        catalog
    }

    /// Create a catalog with no entries
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
            operators: HashMap::new(),
        }
    }

    /// Process-wide built-in catalog, built on first use
    pub fn global() -> &'static FunctionCatalog {
        GLOBAL_CATALOG.get_or_init(FunctionCatalog::new)
    }

    pub fn register(&mut self, entry: FunctionEntry) {
        self.functions.insert(entry.name.to_lowercase(), entry);
    }

    pub fn register_operator(&mut self, operator: BinaryOperator, token: &'static str) {
        self.operators
            .insert(operator, OperatorEntry { operator, token });
    }

    pub fn lookup(&self, name: &str) -> Result<&FunctionEntry> {
        self.functions
            .get(&name.to_lowercase())
            .ok_or_else(|| CompileError::UnknownFunction {
                name: name.to_string(),
            })
    }

    /// Look up `name` and check it accepts `arg_count` arguments
    pub fn resolve_call(&self, name: &str, arg_count: usize) -> Result<&FunctionEntry> {
        let entry = self.lookup(name)?;
        if !entry.arity.accepts(arg_count) {
            return Err(CompileError::ArityMismatch {
                function: name.to_string(),
                expected: entry.arity,
                actual: arg_count,
            });
        }
        Ok(entry)
    }

    pub fn lookup_operator(&self, operator: BinaryOperator) -> Result<&OperatorEntry> {
        self.operators
            .get(&operator)
            .ok_or_else(|| CompileError::UnsupportedOperator {
                operator: operator.as_str().to_string(),
            })
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// log(x) or log(base, x)
fn render_log(args: &[String]) -> String {
    match args {
        [base, value] => format!("Math.log({}) / Math.log({})", value, base),
        _ => format!("Math.log({})", args.join(", ")),
    }
}

fn render_log2(args: &[String]) -> String {
    format!("Math.log({}) / Math.log(2)", args.join(", "))
}

fn render_cot(args: &[String]) -> String {
    format!("1.0 / Math.tan({})", args.join(", "))
}
