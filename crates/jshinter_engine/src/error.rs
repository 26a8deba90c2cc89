//! Engine error types.

use thiserror::Error;

/// Errors that can occur while an engine processes a source file.
///
/// These never escape a lint run as control flow: the runner turns them
/// into a single synthetic lint error for the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The source text could not be tokenized or its brackets do not balance.
    #[error("{message}")]
    Parse {
        /// 1-based line where the failure was detected.
        line: usize,
        /// 1-based column where the failure was detected.
        column: usize,
        /// Error message.
        message: String,
    },
}

impl EngineError {
    /// Creates a new parse error at the given position.
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Returns the `(line, column)` of the failure.
    pub fn position(&self) -> (usize, usize) {
        match self {
            Self::Parse { line, column, .. } => (*line, *column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_is_message() {
        let err = EngineError::parse(3, 7, "Unclosed string.");
        assert_eq!(err.to_string(), "Unclosed string.");
        assert_eq!(err.position(), (3, 7));
    }
}
