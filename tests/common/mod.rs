//! Shared fixtures for end-to-end tests.
//!
//! Each test gets its own corpus and index directory under a tempdir, so
//! builds never interfere with each other.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use webdex::{BuildConfig, BuildStats, FINAL_INDEX_FILE, IndexStore};

/// Write a corpus of `(url, html)` pairs as crawl records.
#[allow(dead_code)] // Used across different integration test crates
pub fn write_corpus(dir: &Path, docs: &[(&str, &str)]) {
    for (ordinal, (url, content)) in docs.iter().enumerate() {
        let record = serde_json::json!({ "url": url, "content": content });
        fs::write(
            dir.join(format!("doc_{ordinal:03}.json")),
            record.to_string(),
        )
        .unwrap();
    }
}

/// A built index plus the tempdirs keeping it alive.
pub struct BuiltIndex {
    pub store: IndexStore,
    pub stats: BuildStats,
    _corpus: TempDir,
    _index: TempDir,
}

/// Build an index over `docs` with default configuration and open it.
pub fn build_and_open(docs: &[(&str, &str)]) -> BuiltIndex {
    let corpus = TempDir::new().unwrap();
    let index = TempDir::new().unwrap();
    write_corpus(corpus.path(), docs);
    let stats = webdex::build(corpus.path(), index.path(), &BuildConfig::default()).unwrap();
    let store = IndexStore::open(&index.path().join(FINAL_INDEX_FILE)).unwrap();
    BuiltIndex {
        store,
        stats,
        _corpus: corpus,
        _index: index,
    }
}
