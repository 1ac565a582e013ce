//! In-memory partial index accumulation.

use crate::types::DocId;
use ahash::{AHashMap, AHashSet};

/// Per-chunk term accumulation plus the build-wide document frequencies.
///
/// The term index is drained on every spill; `df` keeps counting across
/// spills and feeds the merger's bookkeeping check. Represented as an
/// explicit two-level map: `term → (doc → raw tf)`.
#[derive(Debug, Default)]
pub struct Accumulator {
    index: AHashMap<String, AHashMap<DocId, u64>>,
    df: AHashMap<String, u64>,
    docs_since_spill: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one accepted document's terms into the index and bump the
    /// document frequency of each distinct term once.
    pub fn add_document(&mut self, doc_id: &str, terms: &[String]) {
        let mut distinct: AHashSet<&str> = AHashSet::with_capacity(terms.len());
        for term in terms {
            *self
                .index
                .entry(term.clone())
                .or_default()
                .entry(doc_id.to_owned())
                .or_insert(0) += 1;
            distinct.insert(term.as_str());
        }
        for term in distinct {
            *self.df.entry(term.to_owned()).or_insert(0) += 1;
        }
        self.docs_since_spill += 1;
    }

    /// True when either spill trigger has fired.
    pub fn should_spill(&self, chunk_size: usize, token_ceiling: usize) -> bool {
        self.docs_since_spill >= chunk_size || self.index.len() >= token_ceiling
    }

    /// True when no postings are buffered (a spill would be empty).
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of distinct terms currently buffered.
    pub fn distinct_terms(&self) -> usize {
        self.index.len()
    }

    /// Drain the buffered term index for spilling and reset the chunk
    /// counter. Document frequencies are retained.
    pub fn take_index(&mut self) -> AHashMap<String, AHashMap<DocId, u64>> {
        self.docs_since_spill = 0;
        std::mem::take(&mut self.index)
    }

    /// The cumulative document-frequency map.
    pub fn df(&self) -> &AHashMap<String, u64> {
        &self.df
    }
}
