//! Cache entry types.

use std::fmt;

/// Content fingerprint of a source file (BLAKE3, hex encoded).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of the given bytes.
    pub fn of(content: &[u8]) -> Self {
        Self(blake3::hash(content).to_hex().to_string())
    }

    /// Returns the hex representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cache entry for a single source file.
///
/// Holds the lint outcome only. Artifacts are rendered from it every cycle,
/// so the entry stays valid across renderer settings.
#[derive(Debug, Clone, PartialEq, Eq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct CacheEntry {
    /// Path of the file relative to the source root, `/` separated.
    pub file_path: String,

    /// Fingerprint of the content the entry was produced from.
    pub fingerprint: Fingerprint,

    /// Whether the file passed linting.
    pub passed: bool,

    /// Human readable error report, empty when the file passed.
    pub error_report: String,
}

impl CacheEntry {
    /// Creates a new cache entry.
    pub fn new(
        file_path: impl Into<String>,
        fingerprint: Fingerprint,
        passed: bool,
        error_report: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            fingerprint,
            passed,
            error_report: error_report.into(),
        }
    }

    /// Checks if this entry can be reused for content with `fingerprint`.
    pub fn is_valid(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprint == *fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_content_based() {
        let a = Fingerprint::of(b"var a = 1;");
        let b = Fingerprint::of(b"var a = 1;");
        let c = Fingerprint::of(b"var a = 2;");

        assert_eq!(a, b);
        assert_ne!(a, c);
        // BLAKE3 produces 256-bit (64 hex chars) hash
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn test_cache_entry_valid() {
        let fingerprint = Fingerprint::of(b"content");
        let entry = CacheEntry::new("a.js", fingerprint.clone(), true, "");

        assert!(entry.is_valid(&fingerprint));
        assert!(!entry.is_valid(&Fingerprint::of(b"changed")));
    }

    #[test]
    fn test_cache_entry_keeps_report() {
        let entry = CacheEntry::new(
            "lib/core.js",
            Fingerprint::of(b"x"),
            false,
            "lib/core.js: line 1, col 2, Missing semicolon.\n\n1 error",
        );

        assert_eq!(entry.file_path, "lib/core.js");
        assert!(!entry.passed);
        assert!(entry.error_report.ends_with("1 error"));
    }
}
