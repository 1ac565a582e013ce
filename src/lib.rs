//! Conjunctive web search over a crawled corpus.
//!
//! `webdex` builds a persistent TF-IDF inverted index from a directory of
//! crawl records (`{"url", "content"}` JSON files) and answers
//! boolean-AND queries ranked by cosine similarity.
//!
//! # Architecture
//!
//! ```text
//! build:  corpus ─▶ tokenize ─▶ near-dup filter ─▶ accumulate
//!                                       │               │ spill
//!                                       ▼               ▼
//!                                  (rejected)    partial segments ─▶ merge ─▶ final index
//!
//! serve:  final index ─▶ IndexStore (mmap + term directory) ─▶ QueryEngine ─▶ ranked URLs
//! ```
//!
//! The build path is sequential; the serve path is read-only after
//! [`IndexStore::open`] and safe to share across tasks, since every
//! lookup slices the mapping instead of moving a shared cursor.
//!
//! # Usage
//!
//! ```ignore
//! let stats = webdex::build(corpus_dir, index_dir, &BuildConfig::default())?;
//! let store = IndexStore::open(&index_dir.join(FINAL_INDEX_FILE))?;
//! let hits = QueryEngine::new(&store).search("machine learning");
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod dedup;
pub mod error;
pub mod index;
pub mod query;
pub mod store;
pub mod tokenize;
pub mod tracing;
pub mod types;

// Re-exports for public API
pub use config::BuildConfig;
pub use error::{BuildError, Result, StoreError};
pub use index::{BuildStats, FINAL_INDEX_FILE, build};
pub use query::{QueryEngine, SearchHit};
pub use store::IndexStore;
pub use tokenize::Tokenizer;
