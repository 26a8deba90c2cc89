//! Single-file lint invocation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jshinter_engine::{LintConfig, LintEngine, LintError};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of linting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintResult {
    /// Path relative to the source root.
    pub file_path: String,

    /// True iff `errors` is empty.
    pub passed: bool,

    /// Errors in engine order.
    pub errors: Vec<LintError>,
}

impl LintResult {
    /// Creates a result from the engine's error list.
    pub fn new(file_path: impl Into<String>, errors: Vec<LintError>) -> Self {
        Self {
            file_path: file_path.into(),
            passed: errors.is_empty(),
            errors,
        }
    }
}

/// Runs a [`LintEngine`] over file text and counts invocations.
///
/// Safe to share across threads; the engine itself is reentrant.
pub struct LintRunner {
    engine: Arc<dyn LintEngine>,
    invocations: AtomicUsize,
}

impl LintRunner {
    /// Creates a runner for `engine`.
    pub fn new(engine: Arc<dyn LintEngine>) -> Self {
        Self {
            engine,
            invocations: AtomicUsize::new(0),
        }
    }

    /// Lints `file_text` with `config`.
    ///
    /// An engine failure becomes a single error at the failure position,
    /// so one bad file never aborts the cycle.
    pub fn run(&self, file_text: &str, file_path: &str, config: &LintConfig) -> LintResult {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        debug!("Linting {} with {}", file_path, self.engine.name());

        match self.engine.lint(file_text, config) {
            Ok(errors) => LintResult::new(file_path, errors),
            Err(e) => {
                warn!("Engine failed on {}: {}", file_path, e);
                let (line, column) = e.position();
                LintResult::new(file_path, vec![LintError::new(line, column, e.to_string())])
            }
        }
    }

    /// Returns how many times the engine has been invoked.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for LintRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintRunner")
            .field("engine", &self.engine.name())
            .field("invocations", &self.invocations())
            .finish()
    }
}
