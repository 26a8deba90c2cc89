//! # jshinter_core
//!
//! Incremental lint stage for JavaScript source trees.
//!
//! This crate provides:
//! - The `IncrementalProcessor` cycle (diff, resolve config, lint, merge, write)
//! - `.jshintrc` discovery with comment stripping
//! - Error report and QUnit-style test artifact rendering
//! - Aggregated and per-file output layouts
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use jshinter_core::{HinterOptions, IncrementalProcessor};
//!
//! let options = HinterOptions::aggregated("jshint-tests.js");
//! let mut processor = IncrementalProcessor::new(options)?;
//!
//! let report = processor.run_cycle(Path::new("src"), Path::new("dist"))?;
//! println!("{} linted, {} reused", report.linted, report.reused);
//! ```

mod config;
mod error;
mod logging;
mod processor;
pub mod report;
pub mod resolver;
mod runner;
pub mod walker;

pub use config::{ConsoleSink, ErrorEscaper, ErrorSink, HinterOptions, OutputMode};
pub use error::{ConfigError, HinterError};
pub use processor::{CycleReport, CycleState, IncrementalProcessor, output_path};
pub use report::{ReportRenderer, escape_error_string, render_error_report};
pub use resolver::{CONFIG_FILE_NAME, ConfigResolver, strip_comments};
pub use runner::{LintResult, LintRunner};
pub use walker::{SourceWalker, WalkDirWalker};

pub use jshinter_cache::CacheGranularity;
pub use jshinter_engine::{BasicEngine, EngineError, LintConfig, LintEngine, LintError};
