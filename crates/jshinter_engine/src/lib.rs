//! # jshinter_engine
//!
//! Lint engine abstraction layer for jshinter.
//!
//! This crate provides:
//! - A `LintEngine` trait for plugging in a JavaScript linter
//! - `LintConfig`, the `.jshintrc` option map handed to engines
//! - A built-in `BasicEngine` covering a subset of JSHint's checks
//!
//! ## Example
//!
//! ```rust,ignore
//! use jshinter_engine::{BasicEngine, LintConfig, LintEngine};
//!
//! let errors = BasicEngine.lint("var a = 1\n", &LintConfig::new())?;
//! assert_eq!(errors[0].message, "Missing semicolon.");
//! ```

mod basic;
mod config;
mod error;
pub mod lexer;
mod traits;

pub use basic::BasicEngine;
pub use config::LintConfig;
pub use error::EngineError;
pub use traits::{LintEngine, LintError};
