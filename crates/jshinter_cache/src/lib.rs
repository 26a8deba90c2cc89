//! # jshinter_cache
//!
//! Caching system for jshinter.
//!
//! This crate keeps the lint outcome of every file so that an unchanged
//! file is never linted twice.
//!
//! ## Cache Strategy
//!
//! 1. **File-level cache**: Reuse files whose content fingerprint hasn't changed
//! 2. **Settings-aware**: Invalidate everything when the lint config changes
//! 3. **Granularity**: Optionally fall back to whole-tree invalidation
//!
//! ## Storage
//!
//! The cache lives in memory for the lifetime of a processor and can be
//! persisted with `rkyv` for reuse by a later process.

mod diff;
pub mod entry;
mod error;
mod manager;

pub use diff::ChangeSet;
pub use entry::{CacheEntry, Fingerprint};
pub use error::CacheError;
pub use manager::{ArtifactCache, CacheGranularity};
