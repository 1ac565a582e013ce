//! Typed errors for the build and serve paths.
//!
//! Build-side failures that would leave a broken index behind are fatal
//! and abort the build; already-written partial segments are preserved for
//! inspection. Serve-side errors distinguish "index not built" from an
//! index that simply has no matching terms, so a caller can tell an empty
//! result from a broken one.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for webdex operations.
///
/// This is an alias for `anyhow::Result`, with context added via
/// `.context()` at I/O boundaries throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Fatal conditions while building an index.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A partial segment could not be written.
    #[error("failed to write partial segment {path}")]
    SegmentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A partial segment disappeared between spill and merge.
    #[error("partial segment missing at merge time: {path}")]
    SegmentMissing { path: PathBuf },

    /// A partial segment could not be read back during the merge.
    #[error("failed to read partial segment {path}")]
    SegmentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A segment line failed to decode during the merge.
    #[error("malformed record in segment {path} at line {line}")]
    SegmentDecode {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The final index file could not be written.
    #[error("failed to write final index {path}")]
    FinalWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A term was merged from segments but has no document-frequency
    /// entry. The df map outlives every spill, so this is a bookkeeping
    /// bug, never a recoverable input problem.
    #[error("term '{term}' merged from segments but absent from document frequencies")]
    DocFrequencyMissing { term: String },
}

/// Errors surfaced by the index store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The final index file does not exist. Surfaced as its own kind so
    /// callers do not confuse a missing build with an empty result.
    #[error("index not built: {path}")]
    IndexNotBuilt { path: PathBuf },

    /// The index file exists but could not be opened or mapped.
    #[error("failed to open index {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The line at a term's recorded offset failed to decode.
    #[error("index corruption at term '{term}'")]
    Corrupt { term: String },

    /// The store was closed; no further lookups are possible.
    #[error("index store is closed")]
    Closed,
}
