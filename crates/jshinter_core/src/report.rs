//! Error report and test artifact rendering.

use std::sync::Arc;

use jshinter_engine::LintError;

use crate::config::ErrorEscaper;
use crate::runner::LintResult;

/// Escapes text for a single-quoted JS string: newlines become `\n` and
/// single quotes become `\'`.
pub fn escape_error_string(text: &str) -> String {
    text.replace('\n', "\\n").replace('\'', "\\'")
}

/// Formats errors as `<path>: line L, col C, <message>` lines followed by a
/// blank line and an `N error(s)` total.
pub fn render_error_report(file_path: &str, errors: &[LintError]) -> String {
    let mut report = String::new();
    for error in errors {
        report.push_str(&format!(
            "{}: line {}, col {}, {}\n",
            file_path, error.line, error.column, error.message
        ));
    }
    let plural = if errors.len() == 1 { "" } else { "s" };
    report.push_str(&format!("\n{} error{}", errors.len(), plural));
    report
}

/// Turns lint results into error reports and QUnit-style test artifacts.
#[derive(Clone)]
pub struct ReportRenderer {
    escaper: ErrorEscaper,
    disabled: bool,
}

impl ReportRenderer {
    /// Creates a renderer using [`escape_error_string`].
    pub fn new() -> Self {
        Self {
            escaper: Arc::new(escape_error_string),
            disabled: false,
        }
    }

    /// Replaces the escaping strategy.
    pub fn with_escaper(mut self, escaper: ErrorEscaper) -> Self {
        self.escaper = escaper;
        self
    }

    /// Disables artifact rendering.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns the error report for a result, empty when it passed.
    pub fn render_error(&self, result: &LintResult) -> String {
        if result.errors.is_empty() {
            return String::new();
        }
        render_error_report(&result.file_path, &result.errors)
    }

    /// Renders the test artifact for `relative_path` from its lint outcome
    /// and error report.
    ///
    /// Returns `None` when rendering is disabled.
    pub fn render_artifact(
        &self,
        relative_path: &str,
        passed: bool,
        error_report: &str,
    ) -> Option<String> {
        if self.disabled {
            return None;
        }

        let message = if error_report.is_empty() {
            String::new()
        } else {
            format!("\\n{}", (self.escaper)(error_report))
        };

        Some(format!(
            "module('JSHint - {dir}');\n\
             test('{path} should pass jshint', function() {{ \n  \
             ok({passed}, '{path} should pass jshint.{message}'); \n\
             }});\n",
            dir = module_name(relative_path),
            path = relative_path,
            passed = passed,
            message = message,
        ))
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReportRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRenderer")
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Directory part of a `/` separated path, `.` for top-level files.
fn module_name(relative_path: &str) -> &str {
    match relative_path.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir,
        _ => ".",
    }
}
