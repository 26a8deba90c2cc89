//! The incremental lint cycle.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jshinter_cache::{ArtifactCache, CacheEntry, Fingerprint};
use jshinter_engine::{BasicEngine, LintConfig, LintEngine};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{HinterOptions, OutputMode};
use crate::logging::CycleLogger;
use crate::report::ReportRenderer;
use crate::resolver::ConfigResolver;
use crate::runner::LintRunner;
use crate::walker::{SourceWalker, WalkDirWalker, from_slash};
use crate::HinterError;

/// Phase of the processor. Every cycle starts and ends in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Diffing,
    ConfigResolving,
    PerFileProcessing,
    Merging,
    Writing,
}

/// Summary of one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Files matching the extension filter.
    pub files: usize,

    /// Files handed to the engine this cycle.
    pub linted: usize,

    /// Files served from the cache.
    pub reused: usize,

    /// Cached files no longer present.
    pub removed: usize,

    /// Files with at least one error, linted or reused.
    pub failed: usize,

    /// Paths written to the destination directory.
    pub outputs: Vec<PathBuf>,
}

/// A source file read for the current cycle.
#[derive(Debug, Clone)]
struct SourceFile {
    relative_path: String,
    fingerprint: Fingerprint,
    text: String,
}

/// Lints a source tree into a destination directory, reusing cached
/// per-file results across cycles.
///
/// A cycle runs `Diffing -> ConfigResolving -> PerFileProcessing ->
/// Merging -> Writing` and returns to `Idle`. The cache only advances
/// after outputs are written.
pub struct IncrementalProcessor {
    options: HinterOptions,
    inline_config: Option<Arc<LintConfig>>,
    walker: Box<dyn SourceWalker>,
    resolver: ConfigResolver,
    runner: LintRunner,
    renderer: ReportRenderer,
    cache: ArtifactCache,
    state: CycleState,
    written: BTreeSet<PathBuf>,
}

impl IncrementalProcessor {
    /// Creates a processor using the built-in engine.
    pub fn new(options: HinterOptions) -> Result<Self, HinterError> {
        Self::with_engine(options, Arc::new(BasicEngine::new()))
    }

    /// Creates a processor around a custom engine.
    pub fn with_engine(
        options: HinterOptions,
        engine: Arc<dyn LintEngine>,
    ) -> Result<Self, HinterError> {
        options.validate()?;

        let mut renderer = ReportRenderer::new().disabled(options.disable_test_generator);
        if let Some(escaper) = &options.escape_error_string {
            renderer = renderer.with_escaper(Arc::clone(escaper));
        }

        let mut cache = ArtifactCache::new(options.cache_granularity);
        if let Some(dir) = &options.cache_dir {
            cache = cache.with_cache_dir(dir);
            if let Err(e) = cache.load() {
                warn!("Ignoring unreadable cache: {}", e);
            }
        }

        info!(
            "Using lint engine '{}' ({:?} output)",
            engine.name(),
            options.output_mode
        );

        Ok(Self {
            inline_config: options.lint_config.clone().map(Arc::new),
            options,
            walker: Box::new(WalkDirWalker::new()),
            resolver: ConfigResolver::new(),
            runner: LintRunner::new(engine),
            renderer,
            cache,
            state: CycleState::Idle,
            written: BTreeSet::new(),
        })
    }

    /// Replaces the source walker.
    pub fn with_walker(mut self, walker: impl SourceWalker + 'static) -> Self {
        self.walker = Box::new(walker);
        self
    }

    /// Replaces the config resolver.
    pub fn with_resolver(mut self, resolver: ConfigResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn options(&self) -> &HinterOptions {
        &self.options
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Total engine invocations across all cycles.
    pub fn lint_invocations(&self) -> usize {
        self.runner.invocations()
    }

    /// Runs one cycle from `src_dir` into `dest_dir`.
    ///
    /// Returns [`HinterError::LintFailed`] after writing outputs when
    /// `failOnAnyError` is set and any file failed.
    pub fn run_cycle(&mut self, src_dir: &Path, dest_dir: &Path) -> Result<CycleReport, HinterError> {
        let result = self.run_cycle_inner(src_dir, dest_dir);
        self.transition(CycleState::Idle);
        result
    }

    fn run_cycle_inner(&mut self, src_dir: &Path, dest_dir: &Path) -> Result<CycleReport, HinterError> {
        info!("Linting {} into {}", src_dir.display(), dest_dir.display());

        self.transition(CycleState::Diffing);
        let files = self.read_tree(src_dir)?;
        let changes = self
            .cache
            .diff(files.iter().map(|f| (f.relative_path.as_str(), &f.fingerprint)));

        self.transition(CycleState::ConfigResolving);
        let config = self.resolve_config(src_dir);
        let config_hash = config.hash();
        let settings_match = self.cache.settings_match(&config_hash);
        if !settings_match && !self.cache.is_empty() {
            info!("Lint config changed, re-linting every file");
        }

        self.transition(CycleState::PerFileProcessing);
        let reusable: HashSet<&str> = if settings_match {
            self.cache
                .reusable(&changes)
                .iter()
                .map(String::as_str)
                .collect()
        } else {
            HashSet::new()
        };
        let misses: Vec<&SourceFile> = files
            .iter()
            .filter(|f| !reusable.contains(f.relative_path.as_str()))
            .collect();
        debug!(
            "{} files to lint, {} reusable",
            misses.len(),
            files.len() - misses.len()
        );
        let fresh = self.process_files(&misses, &config);

        self.transition(CycleState::Merging);
        let mut fresh_by_path: HashMap<String, CacheEntry> = fresh
            .into_iter()
            .map(|entry| (entry.file_path.clone(), entry))
            .collect();
        let mut entries = Vec::with_capacity(files.len());
        for file in &files {
            let entry = match fresh_by_path.remove(&file.relative_path) {
                Some(entry) => entry,
                None => self.cache.get(&file.relative_path).cloned().ok_or_else(|| {
                    HinterError::internal(format!("no cache entry for {}", file.relative_path))
                })?,
            };
            entries.push(entry);
        }

        let mut logger = CycleLogger::new(&self.options);
        for entry in entries.iter().filter(|e| !e.passed) {
            logger.log_failure(&entry.error_report);
        }
        let outputs = self.merge_outputs(&entries)?;

        self.transition(CycleState::Writing);
        let written = write_outputs(dest_dir, &outputs)?;
        self.prune_stale_outputs(dest_dir, &written);

        let report = CycleReport {
            files: files.len(),
            linted: misses.len(),
            reused: files.len() - misses.len(),
            removed: changes.removed_files.len(),
            failed: logger.failures(),
            outputs: written.iter().cloned().collect(),
        };
        self.written = written;

        self.cache.commit(
            &config_hash,
            entries
                .into_iter()
                .map(|entry| (entry.file_path.clone(), entry))
                .collect(),
        );
        if let Err(e) = self.cache.save() {
            warn!("Failed to save cache: {}", e);
        }

        logger.finish();
        info!(
            "Cycle done: {} files, {} linted, {} reused, {} failed",
            report.files, report.linted, report.reused, report.failed
        );

        if self.options.fail_on_any_error && report.failed > 0 {
            return Err(HinterError::LintFailed {
                failed: report.failed,
            });
        }
        Ok(report)
    }

    fn transition(&mut self, next: CycleState) {
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn read_tree(&self, src_dir: &Path) -> Result<Vec<SourceFile>, HinterError> {
        let paths = self.walker.walk(src_dir)?;
        paths
            .into_iter()
            .filter(|path| self.options.matches_extension(path))
            .map(|relative_path| {
                let full_path = src_dir.join(from_slash(&relative_path));
                let bytes = fs::read(&full_path).map_err(|e| HinterError::io(&full_path, e))?;
                Ok(SourceFile {
                    fingerprint: Fingerprint::of(&bytes),
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                    relative_path,
                })
            })
            .collect()
    }

    fn resolve_config(&mut self, src_dir: &Path) -> Arc<LintConfig> {
        if let Some(config) = &self.inline_config {
            return Arc::clone(config);
        }

        self.resolver.begin_cycle();
        let root = match &self.options.lint_config_root {
            Some(root) => src_dir.join(root),
            None => src_dir.to_path_buf(),
        };
        self.resolver
            .resolve(&root)
            .unwrap_or_else(|| Arc::new(LintConfig::new()))
    }

    fn process_files(&self, misses: &[&SourceFile], config: &LintConfig) -> Vec<CacheEntry> {
        if self.options.parallel {
            misses
                .par_iter()
                .map(|file| self.process_file(file, config))
                .collect()
        } else {
            misses
                .iter()
                .map(|file| self.process_file(file, config))
                .collect()
        }
    }

    fn process_file(&self, file: &SourceFile, config: &LintConfig) -> CacheEntry {
        let result = self.runner.run(&file.text, &file.relative_path, config);
        let error_report = self.renderer.render_error(&result);

        CacheEntry::new(
            file.relative_path.clone(),
            file.fingerprint.clone(),
            result.passed,
            error_report,
        )
    }

    /// Renders the artifact of a cached or fresh entry with the current
    /// renderer.
    fn render_artifact(&self, entry: &CacheEntry) -> Option<String> {
        self.renderer
            .render_artifact(&entry.file_path, entry.passed, &entry.error_report)
    }

    fn merge_outputs(&self, entries: &[CacheEntry]) -> Result<Vec<(PathBuf, String)>, HinterError> {
        match self.options.output_mode {
            OutputMode::Aggregated => {
                let dest_file = self
                    .options
                    .dest_file
                    .as_deref()
                    .ok_or_else(|| HinterError::config("destFile is required for aggregated output"))?;
                let content = entries
                    .iter()
                    .filter_map(|entry| self.render_artifact(entry))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                Ok(vec![(from_slash(dest_file), content)])
            }
            OutputMode::PerFile => Ok(entries
                .iter()
                .filter_map(|entry| {
                    let artifact = self.render_artifact(entry)?;
                    Some((
                        output_path(&entry.file_path, &self.options.output_marker),
                        artifact,
                    ))
                })
                .collect()),
        }
    }

    /// Removes outputs the previous cycle wrote into `dest_dir` that this
    /// cycle no longer produces.
    fn prune_stale_outputs(&self, dest_dir: &Path, written: &BTreeSet<PathBuf>) {
        for stale in self
            .written
            .difference(written)
            .filter(|path| path.starts_with(dest_dir))
        {
            debug!("Removing stale output {}", stale.display());
            if let Err(e) = fs::remove_file(stale)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!("Failed to remove {}: {}", stale.display(), e);
            }
        }
    }
}

impl std::fmt::Debug for IncrementalProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalProcessor")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("runner", &self.runner)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Per-file output path: `lib/core.js` becomes `lib/core.<marker>.js`.
pub fn output_path(relative_path: &str, marker: &str) -> PathBuf {
    let (dir, name) = match relative_path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, relative_path),
    };
    let renamed = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}.{}.{}", stem, marker, ext),
        _ => format!("{}.{}", name, marker),
    };
    match dir {
        Some(dir) => from_slash(dir).join(renamed),
        None => PathBuf::from(renamed),
    }
}

fn write_outputs(
    dest_dir: &Path,
    outputs: &[(PathBuf, String)],
) -> Result<BTreeSet<PathBuf>, HinterError> {
    fs::create_dir_all(dest_dir).map_err(|e| HinterError::io(dest_dir, e))?;

    let mut written = BTreeSet::new();
    for (relative, content) in outputs {
        let path = dest_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| HinterError::io(parent, e))?;
        }
        write_atomic(&path, content.as_bytes())?;
        written.insert(path);
    }
    Ok(written)
}

/// Writes through a sibling temp file so readers never see partial output.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), HinterError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).map_err(|e| HinterError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            warn!("Failed to remove {}: {}", tmp.display(), cleanup);
        }
        return Err(HinterError::io(path, e));
    }
    Ok(())
}
