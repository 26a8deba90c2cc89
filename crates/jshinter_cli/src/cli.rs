//! CLI argument definitions

use std::path::PathBuf;

use clap::Parser;

/// jshinter - Incremental JSHint stage for JavaScript build pipelines
#[derive(Parser, Debug)]
#[command(name = "jshinter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory to lint
    pub source: PathBuf,

    /// Destination directory for generated test files
    pub dest: PathBuf,

    /// Options file (JSON with comments)
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Aggregated output file, relative to DEST
    #[arg(long, value_name = "PATH", conflicts_with = "per_file")]
    pub dest_file: Option<String>,

    /// Write one test file per source file
    #[arg(long)]
    pub per_file: bool,

    /// Directory, relative to SOURCE, where .jshintrc lookup starts
    #[arg(long, value_name = "DIR")]
    pub config_root: Option<String>,

    /// Do not print lint errors
    #[arg(long)]
    pub no_log: bool,

    /// Lint without generating test files
    #[arg(long)]
    pub disable_test_generator: bool,

    /// Exit with status 1 if any file fails linting
    #[arg(long)]
    pub fail_on_any_error: bool,

    /// Re-lint every file when anything in the tree changed
    #[arg(long)]
    pub whole_tree: bool,

    /// Directory to persist the cache in
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Disable caching
    #[arg(long, conflicts_with = "cache_dir")]
    pub no_cache: bool,

    /// Lint files in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
