//! Hinter error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while running a lint cycle.
#[derive(Debug, Error)]
pub enum HinterError {
    /// Invalid options.
    #[error("Configuration error: {0}")]
    Config(String),

    /// At least one file failed linting and `failOnAnyError` is set.
    #[error("JSHint failed: {failed} file(s) did not pass")]
    LintFailed { failed: usize },

    /// Reading the source tree or writing outputs failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an I/O error for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Errors raised while loading a `.jshintrc`.
///
/// These never abort a cycle: the resolver logs them and lints with an
/// empty configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a JSON object after comment stripping.
    #[error("Error occurred parsing {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Returns the path of the offending file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}
