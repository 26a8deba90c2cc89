//! Source tree discovery.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::HinterError;

/// Lists the files of a source tree.
///
/// Implementations return paths relative to `root`, `/` separated, in a
/// deterministic order.
pub trait SourceWalker: Send + Sync {
    fn walk(&self, root: &Path) -> Result<Vec<String>, HinterError>;
}

/// Walks the real filesystem with `walkdir`, sorted by file name.
#[derive(Debug, Clone, Default)]
pub struct WalkDirWalker;

impl WalkDirWalker {
    pub fn new() -> Self {
        Self
    }
}

impl SourceWalker for WalkDirWalker {
    fn walk(&self, root: &Path) -> Result<Vec<String>, HinterError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                HinterError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).map_err(|_| {
                HinterError::internal(format!(
                    "{} is outside {}",
                    entry.path().display(),
                    root.display()
                ))
            })?;
            files.push(to_slash(relative));
        }

        debug!("Found {} files under {}", files.len(), root.display());
        Ok(files)
    }
}

/// Joins path components with `/` regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Converts a `/` separated relative path back into a platform path.
pub fn from_slash(relative: &str) -> PathBuf {
    relative.split('/').collect()
}
