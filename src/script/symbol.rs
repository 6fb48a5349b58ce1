//! Generation of unique script variable names.

use log::trace;

/// First counter value of a fresh generator
pub const DEFAULT_SYMBOL_BASELINE: u64 = 1;

/// Issues `<token>_<n>` names from a monotonically increasing counter.
///
/// Not shared between threads: every compilation session owns its own
/// generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolGenerator {
    next_id: u64,
}

impl SymbolGenerator {
    pub fn new() -> Self {
        Self::with_baseline(DEFAULT_SYMBOL_BASELINE)
    }

    pub fn with_baseline(baseline: u64) -> Self {
        Self { next_id: baseline }
    }

    /// Return `<token>_<n>` for the current counter value, then advance
    pub fn next(&mut self, token: &str) -> String {
        let symbol = format!("{}_{}", token, self.next_id);
        self.next_id += 1;
        trace!("issued symbol {}", symbol);
        symbol
    }

    /// Counter value the next symbol will carry
    pub fn peek(&self) -> u64 {
        self.next_id
    }
}

impl Default for SymbolGenerator {
    fn default() -> Self {
        Self::new()
    }
}
