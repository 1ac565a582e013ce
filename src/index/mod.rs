//! Index construction pipeline.
//!
//! The build path runs sequentially: scan the corpus, tokenize each page,
//! filter near-duplicates, accumulate postings, spill a partial segment
//! whenever a trigger fires, then merge all segments into the final
//! TF-IDF index. Everything the build allocates (accumulator, document
//! frequencies, dedup window) is discarded once the merge completes.

mod accumulator;
mod merge;
mod segment;

pub use accumulator::Accumulator;
pub use merge::FINAL_INDEX_FILE;

use crate::config::BuildConfig;
use crate::corpus;
use crate::dedup::NearDupDetector;
use crate::error::{BuildError, Result};
use crate::tokenize::Tokenizer;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Statistics from one build run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStats {
    /// Documents indexed (the `N` of the IDF computation).
    pub docs_indexed: usize,
    /// Documents rejected as near-duplicates.
    pub near_duplicates: usize,
    /// Corpus entries skipped because they could not be read or decoded.
    pub unreadable_files: usize,
    /// Partial segments spilled before the merge.
    pub segments: usize,
    /// Distinct terms in the final index.
    pub distinct_terms: usize,
}

/// Build a final index from the crawl records under `corpus_dir` into
/// `index_dir`, which is recreated from scratch.
pub fn build(corpus_dir: &Path, index_dir: &Path, config: &BuildConfig) -> Result<BuildStats> {
    if index_dir.exists() {
        fs::remove_dir_all(index_dir)
            .with_context(|| format!("clearing index dir {}", index_dir.display()))?;
    }
    fs::create_dir_all(index_dir)
        .with_context(|| format!("creating index dir {}", index_dir.display()))?;

    let tokenizer = Tokenizer::new();
    let mut dedup = NearDupDetector::new(
        config.simhash_window,
        config.simhash_hamming_threshold,
        config.jaccard_threshold,
    );
    let mut accumulator = Accumulator::new();
    let mut segments: Vec<PathBuf> = Vec::new();
    let mut stats = BuildStats::default();

    let mut unreadable_files = 0usize;
    for doc in corpus::scan(corpus_dir, &mut unreadable_files) {
        let raw_tokens = tokenizer.html_raw_tokens(&doc.html);
        if dedup.is_duplicate(&raw_tokens) {
            tracing::debug!(doc_id = %doc.doc_id, "near-duplicate, skipping");
            stats.near_duplicates += 1;
            continue;
        }

        let terms = tokenizer.html_terms(&doc.html);
        accumulator.add_document(&doc.doc_id, &terms);
        stats.docs_indexed += 1;

        if accumulator.should_spill(config.chunk_size, config.token_ceiling) {
            spill(&mut accumulator, index_dir, &mut segments)?;
        }
    }
    if !accumulator.is_empty() {
        spill(&mut accumulator, index_dir, &mut segments)?;
    }
    stats.unreadable_files = unreadable_files;
    stats.segments = segments.len();

    stats.distinct_terms = merge::merge_segments(
        index_dir,
        &segments,
        accumulator.df(),
        stats.docs_indexed,
    )?;

    // The merge consumed the segments; on a fatal merge error above they
    // stay on disk for inspection instead.
    for path in &segments {
        if let Err(error) = fs::remove_file(path) {
            tracing::debug!(path = %path.display(), %error, "could not remove partial segment");
        }
    }

    tracing::info!(
        docs = stats.docs_indexed,
        near_duplicates = stats.near_duplicates,
        unreadable_files = stats.unreadable_files,
        segments = stats.segments,
        terms = stats.distinct_terms,
        "index build complete"
    );
    Ok(stats)
}

fn spill(
    accumulator: &mut Accumulator,
    index_dir: &Path,
    segments: &mut Vec<PathBuf>,
) -> std::result::Result<(), BuildError> {
    let index = accumulator.take_index();
    if index.is_empty() {
        // All documents in the chunk were empty; nothing to write.
        return Ok(());
    }
    let path = segment::segment_path(index_dir, segments.len());
    let terms = index.len();
    segment::write_segment(&path, index)?;
    tracing::info!(path = %path.display(), terms, "spilled partial index");
    segments.push(path);
    Ok(())
}
