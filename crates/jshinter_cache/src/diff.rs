//! Change detection between cycles.

/// Result of comparing the current source tree against the cache.
///
/// Every current file lands in exactly one of new, modified or unchanged;
/// removed holds cached files that are no longer present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Files that have no cache entry.
    pub new_files: Vec<String>,

    /// Files whose fingerprint differs from their cache entry.
    pub modified_files: Vec<String>,

    /// Cached files missing from the current tree.
    pub removed_files: Vec<String>,

    /// Files whose fingerprint matches their cache entry.
    pub unchanged_files: Vec<String>,
}

impl ChangeSet {
    /// Returns `true` if there are no changes (no new, modified, or removed files).
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.removed_files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_change_set() {
        let changes = ChangeSet {
            unchanged_files: vec!["a.js".to_string()],
            ..ChangeSet::default()
        };

        assert!(changes.is_empty());
    }

    #[test]
    fn test_removed_files_count_as_change() {
        let changes = ChangeSet {
            removed_files: vec!["gone.js".to_string()],
            ..ChangeSet::default()
        };

        assert!(!changes.is_empty());
    }

    #[test]
    fn test_new_and_modified_count_as_change() {
        let changes = ChangeSet {
            new_files: vec!["a.js".to_string()],
            modified_files: vec!["b.js".to_string(), "c.js".to_string()],
            ..ChangeSet::default()
        };

        assert!(!changes.is_empty());
    }
}
