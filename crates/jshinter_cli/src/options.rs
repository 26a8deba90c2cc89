//! Options loading: JSONC options file first, then command-line flags.

use std::path::Path;

use jsonc_parser::ParseOptions;
use jshinter_core::{CacheGranularity, HinterOptions, OutputMode};
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use tracing::debug;

use crate::cli::Cli;

pub fn load_options(cli: &Cli) -> Result<HinterOptions> {
    let mut options = match &cli.options {
        Some(path) => read_options_file(path)?,
        None => HinterOptions::default(),
    };
    apply_flags(&mut options, cli);
    debug!("Resolved options: {:?}", options);
    Ok(options)
}

fn read_options_file(path: &Path) -> Result<HinterOptions> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read options file {}", path.display()))?;
    parse_options(&content).wrap_err_with(|| format!("Invalid options file {}", path.display()))
}

/// Parses an options document that may contain comments and trailing commas.
pub fn parse_options(content: &str) -> Result<HinterOptions> {
    let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
        .map_err(|e| miette!("Failed to parse options: {}", e))?
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    HinterOptions::from_value(value).into_diagnostic()
}

/// Flags override whatever the options file set.
fn apply_flags(options: &mut HinterOptions, cli: &Cli) {
    if let Some(dest_file) = &cli.dest_file {
        options.dest_file = Some(dest_file.clone());
        options.output_mode = OutputMode::Aggregated;
    }
    if cli.per_file {
        options.output_mode = OutputMode::PerFile;
    }
    if let Some(root) = &cli.config_root {
        options.lint_config_root = Some(root.clone());
    }
    if cli.no_log {
        options.log = false;
    }
    if cli.disable_test_generator {
        options.disable_test_generator = true;
    }
    if cli.fail_on_any_error {
        options.fail_on_any_error = true;
    }
    if cli.whole_tree {
        options.cache_granularity = CacheGranularity::WholeTree;
    }
    if let Some(dir) = &cli.cache_dir {
        options.cache_dir = Some(dir.clone());
    }
    if cli.no_cache {
        options.cache_dir = None;
    }
    if cli.parallel {
        options.parallel = true;
    }
}
