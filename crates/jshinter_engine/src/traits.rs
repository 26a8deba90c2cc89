//! Lint engine trait definition.

use serde::{Deserialize, Serialize};

use crate::{EngineError, LintConfig};

/// A single problem reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LintError {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
    /// Human readable reason, e.g. `Missing semicolon.`.
    pub message: String,
}

impl LintError {
    /// Creates a new lint error.
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Trait for linting JavaScript source text.
///
/// The error list is the return value of the call itself; engines must not
/// keep per-run results around for callers to read afterwards. Because
/// `lint` takes `&self` and engines are `Send + Sync`, one instance can be
/// shared between threads.
///
/// # Example
///
/// ```rust,ignore
/// use jshinter_engine::{EngineError, LintConfig, LintEngine, LintError};
///
/// struct NoTabs;
///
/// impl LintEngine for NoTabs {
///     fn name(&self) -> &str {
///         "no-tabs"
///     }
///
///     fn lint(&self, source: &str, _config: &LintConfig) -> Result<Vec<LintError>, EngineError> {
///         Ok(source
///             .lines()
///             .enumerate()
///             .filter(|(_, line)| line.contains('\t'))
///             .map(|(i, _)| LintError::new(i + 1, 1, "Mixed tabs."))
///             .collect())
///     }
/// }
/// ```
pub trait LintEngine: Send + Sync {
    /// Returns the name of this engine.
    fn name(&self) -> &str;

    /// Lints the source text with the given configuration.
    ///
    /// Returns the errors in source order. An empty list means the file is
    /// clean.
    fn lint(&self, source: &str, config: &LintConfig) -> Result<Vec<LintError>, EngineError>;
}
