//! Hinter options.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jshinter_cache::CacheGranularity;
use jshinter_engine::LintConfig;
use serde::{Deserialize, Serialize};

use crate::HinterError;

/// Receives one formatted error report per failing file.
pub type ErrorSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Receives console lines (the buffered error block and the summary).
pub type ConsoleSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Escapes an error report for embedding in a single-quoted JS string.
pub type ErrorEscaper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How artifacts are laid out in the destination directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    /// All artifacts concatenated into `destFile`.
    #[default]
    Aggregated,

    /// One artifact per source file, named `<stem>.<marker>.<ext>`.
    PerFile,
}

/// Options for an [`IncrementalProcessor`](crate::IncrementalProcessor).
///
/// Field names follow the JSON option names (`destFile`, `failOnAnyError`,
/// ...). Sinks and the escaper can only be set from code.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HinterOptions {
    /// Aggregated output path, relative to the destination directory.
    #[serde(default)]
    pub dest_file: Option<String>,

    #[serde(default)]
    pub output_mode: OutputMode,

    /// Emit error reports and the summary.
    #[serde(default = "default_true")]
    pub log: bool,

    /// Inline lint config; disables `.jshintrc` discovery.
    #[serde(default, alias = "jshintrc")]
    pub lint_config: Option<LintConfig>,

    /// Directory, relative to the source root, where discovery starts.
    /// May point outside the tree via `..`.
    #[serde(default, rename = "jshintrcRoot", alias = "lintConfigRoot")]
    pub lint_config_root: Option<String>,

    /// Skip artifact rendering; linting and logging still happen.
    #[serde(default)]
    pub disable_test_generator: bool,

    /// Fail the cycle when any file has errors.
    #[serde(default)]
    pub fail_on_any_error: bool,

    /// Suffixes of files to lint.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Marker inserted into per-file output names.
    #[serde(default = "default_output_marker")]
    pub output_marker: String,

    #[serde(default)]
    pub cache_granularity: CacheGranularity,

    /// Persist the cache here between processes.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Lint cache misses on the rayon pool.
    #[serde(default)]
    pub parallel: bool,

    #[serde(skip)]
    pub log_error: Option<ErrorSink>,

    #[serde(skip)]
    pub console: Option<ConsoleSink>,

    #[serde(skip)]
    pub escape_error_string: Option<ErrorEscaper>,
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec![".js".to_string()]
}

fn default_output_marker() -> String {
    "jshint".to_string()
}

impl HinterOptions {
    /// Options for aggregated output into `dest_file`.
    pub fn aggregated(dest_file: impl Into<String>) -> Self {
        Self {
            dest_file: Some(dest_file.into()),
            ..Self::default()
        }
    }

    /// Options for per-file output.
    pub fn per_file() -> Self {
        Self {
            output_mode: OutputMode::PerFile,
            ..Self::default()
        }
    }

    /// Parses options from JSON. Unknown keys are rejected.
    pub fn from_json(json: &str) -> Result<Self, HinterError> {
        serde_json::from_str(json).map_err(|e| HinterError::config(format!("Invalid options: {}", e)))
    }

    /// Parses options from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, HinterError> {
        serde_json::from_value(value)
            .map_err(|e| HinterError::config(format!("Invalid options: {}", e)))
    }

    /// Checks option combinations that serde cannot.
    pub fn validate(&self) -> Result<(), HinterError> {
        if self.output_mode == OutputMode::Aggregated
            && self.dest_file.as_deref().is_none_or(str::is_empty)
        {
            return Err(HinterError::config(
                "destFile is required for aggregated output",
            ));
        }
        if self.extensions.is_empty() {
            return Err(HinterError::config("extensions must not be empty"));
        }
        if self.output_marker.is_empty() || self.output_marker.contains('/') {
            return Err(HinterError::config(format!(
                "invalid outputMarker '{}'",
                self.output_marker
            )));
        }
        Ok(())
    }

    /// Returns true if `relative_path` has one of the configured suffixes.
    pub fn matches_extension(&self, relative_path: &str) -> bool {
        self.extensions.iter().any(|ext| relative_path.ends_with(ext.as_str()))
    }

    pub fn with_lint_config(mut self, config: LintConfig) -> Self {
        self.lint_config = Some(config);
        self
    }

    pub fn with_lint_config_root(mut self, root: impl Into<String>) -> Self {
        self.lint_config_root = Some(root.into());
        self
    }

    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Routes per-file error reports to `sink` instead of the console buffer.
    pub fn with_error_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log_error = Some(Arc::new(sink));
        self
    }

    /// Routes console output to `sink` instead of stdout.
    pub fn with_console(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.console = Some(Arc::new(sink));
        self
    }

    /// Overrides how error reports are escaped inside artifacts.
    pub fn with_escaper(mut self, escaper: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.escape_error_string = Some(Arc::new(escaper));
        self
    }
}

impl Default for HinterOptions {
    fn default() -> Self {
        Self {
            dest_file: None,
            output_mode: OutputMode::default(),
            log: true,
            lint_config: None,
            lint_config_root: None,
            disable_test_generator: false,
            fail_on_any_error: false,
            extensions: default_extensions(),
            output_marker: default_output_marker(),
            cache_granularity: CacheGranularity::default(),
            cache_dir: None,
            parallel: false,
            log_error: None,
            console: None,
            escape_error_string: None,
        }
    }
}

impl fmt::Debug for HinterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HinterOptions")
            .field("dest_file", &self.dest_file)
            .field("output_mode", &self.output_mode)
            .field("log", &self.log)
            .field("lint_config", &self.lint_config)
            .field("lint_config_root", &self.lint_config_root)
            .field("disable_test_generator", &self.disable_test_generator)
            .field("fail_on_any_error", &self.fail_on_any_error)
            .field("extensions", &self.extensions)
            .field("output_marker", &self.output_marker)
            .field("cache_granularity", &self.cache_granularity)
            .field("cache_dir", &self.cache_dir)
            .field("parallel", &self.parallel)
            .field("log_error", &self.log_error.is_some())
            .field("console", &self.console.is_some())
            .field("escape_error_string", &self.escape_error_string.is_some())
            .finish()
    }
}
