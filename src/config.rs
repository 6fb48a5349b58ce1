//! Compiler configuration.

use crate::script::error::{CompileError, Result};
use crate::script::symbol::DEFAULT_SYMBOL_BASELINE;
use serde::{Deserialize, Serialize};

/// Script language name reported to the search engine
pub const DEFAULT_SCRIPT_LANG: &str = "painless";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Counter value of the first symbol issued in a session
    pub symbol_baseline: u64,
    /// Declare a bare literal or field on the left of a WHERE comparison as
    /// its own symbol instead of inlining its text into the condition
    pub wrap_bare_operands: bool,
    /// Value of the `lang` key in emitted script objects
    pub script_lang: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            symbol_baseline: DEFAULT_SYMBOL_BASELINE,
            wrap_bare_operands: false,
            script_lang: DEFAULT_SCRIPT_LANG.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Parse a JSON config; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CompileError::InvalidConfig(e.to_string()))
    }

    pub fn with_symbol_baseline(mut self, baseline: u64) -> Self {
        self.symbol_baseline = baseline;
        self
    }

    pub fn with_wrap_bare_operands(mut self, wrap: bool) -> Self {
        self.wrap_bare_operands = wrap;
        self
    }
}
