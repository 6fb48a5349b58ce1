//! Per-query compilation scope.

use crate::script::symbol::SymbolGenerator;

/// State owned by one query's expression compilation.
///
/// A session is created for a single query and dropped afterwards. Everything
/// compiled through the same session draws symbols from one counter, so no two
/// generated names collide even for identical sub-expressions.
#[derive(Debug, Clone, Default)]
pub struct CompilationSession {
    symbols: SymbolGenerator,
}

impl CompilationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline(baseline: u64) -> Self {
        Self {
            symbols: SymbolGenerator::with_baseline(baseline),
        }
    }

    /// Issue the next unique symbol for `token`
    pub fn next_symbol(&mut self, token: &str) -> String {
        self.symbols.next(token)
    }

    pub fn symbols(&self) -> &SymbolGenerator {
        &self.symbols
    }

    /// Run `f` against a scratch copy of this session and keep its state only
    /// when `f` succeeds, so a failed compilation consumes no symbols.
    pub(crate) fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut CompilationSession) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut scratch = self.clone();
        let value = f(&mut scratch)?;
        *self = scratch;
        Ok(value)
    }
}
