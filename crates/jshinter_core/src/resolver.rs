//! `.jshintrc` discovery and loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, OnceLock};

use jshinter_engine::LintConfig;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::ConfigError;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".jshintrc";

static BLOCK_COMMENT: OnceLock<Regex> = OnceLock::new();
static LINE_COMMENT: OnceLock<Regex> = OnceLock::new();

/// Removes `/* */` and `//` comments from configuration text.
///
/// Block comments are removed first, then line comments. Comment markers
/// inside string values are not recognized as strings.
pub fn strip_comments(text: &str) -> String {
    let block = BLOCK_COMMENT
        .get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));
    let line = LINE_COMMENT
        .get_or_init(|| Regex::new(r"//[^\n\r]*").expect("line comment pattern is valid"));

    let without_blocks = block.replace_all(text, "");
    line.replace_all(&without_blocks, "").into_owned()
}

/// Makes `path` absolute and removes `.` and `..` components lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Locates the nearest `.jshintrc` at or above a starting directory.
///
/// Results are memoized per starting directory until [`begin_cycle`] is
/// called, so a cycle reads the file at most once.
///
/// [`begin_cycle`]: ConfigResolver::begin_cycle
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    file_name: String,
    memo: HashMap<PathBuf, Option<Arc<LintConfig>>>,
}

impl ConfigResolver {
    /// Creates a resolver looking for `.jshintrc`.
    pub fn new() -> Self {
        Self::with_file_name(CONFIG_FILE_NAME)
    }

    /// Creates a resolver looking for a custom file name.
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            memo: HashMap::new(),
        }
    }

    /// Returns the file name being searched for.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Forgets memoized results so edits made between cycles are seen.
    pub fn begin_cycle(&mut self) {
        self.memo.clear();
    }

    /// Finds the configuration file, walking upward from `root`.
    ///
    /// Matching is case-insensitive; an exact-case match wins when a
    /// directory holds several candidates.
    pub fn find(&self, root: &Path) -> Option<PathBuf> {
        let start = normalize_path(root);
        start.ancestors().find_map(|dir| self.find_in_dir(dir))
    }

    fn find_in_dir(&self, dir: &Path) -> Option<PathBuf> {
        let exact = dir.join(&self.file_name);
        if exact.is_file() {
            return Some(exact);
        }

        let entries = fs::read_dir(dir).ok()?;
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.eq_ignore_ascii_case(&self.file_name))
            })
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        candidates.sort();
        candidates.into_iter().next()
    }

    /// Parses configuration text, tolerating comments.
    pub fn parse(content: &str, path: &Path) -> Result<LintConfig, ConfigError> {
        let stripped = strip_comments(content);
        match serde_json::from_str::<Value>(&stripped) {
            Ok(Value::Object(map)) => Ok(LintConfig::from_map(map)),
            Ok(_) => Err(ConfigError::parse(path, "expected a JSON object")),
            Err(e) => Err(ConfigError::parse(path, e.to_string())),
        }
    }

    /// Finds and parses the configuration for `root`.
    ///
    /// Returns `Ok(None)` when no file exists at or above `root`.
    pub fn load(&self, root: &Path) -> Result<Option<LintConfig>, ConfigError> {
        let Some(path) = self.find(root) else {
            debug!("No {} found above {}", self.file_name, root.display());
            return Ok(None);
        };

        debug!("Loading lint config from {}", path.display());
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content, &path).map(Some)
    }

    /// Resolves the configuration for `root`, memoized for the cycle.
    ///
    /// Load failures are logged and treated as "no configuration".
    pub fn resolve(&mut self, root: &Path) -> Option<Arc<LintConfig>> {
        let key = normalize_path(root);
        if let Some(cached) = self.memo.get(&key) {
            return cached.clone();
        }

        let resolved = match self.load(&key) {
            Ok(config) => config.map(Arc::new),
            Err(e) => {
                error!("{}", e);
                None
            }
        };
        self.memo.insert(key, resolved.clone());
        resolved
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}
