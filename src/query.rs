//! Conjunctive query evaluation with cosine ranking.

use crate::store::IndexStore;
use crate::tokenize::Tokenizer;
use crate::types::{DocId, PostingList};
use ahash::AHashSet;

/// Guards the cosine denominator; an all-zero document vector scores 0
/// instead of NaN.
const EPSILON: f64 = 1e-9;

/// A ranked query hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
}

/// Evaluates boolean-AND queries against an open [`IndexStore`].
///
/// Query text is normalized by the same tokenizer the index was built
/// with, so an inflected query word and its indexed occurrences meet at
/// the same stem.
pub struct QueryEngine<'store> {
    store: &'store IndexStore,
    tokenizer: Tokenizer,
}

impl<'store> QueryEngine<'store> {
    pub fn new(store: &'store IndexStore) -> Self {
        Self {
            store,
            tokenizer: Tokenizer::new(),
        }
    }

    /// Rank every document containing all query terms by cosine
    /// similarity between its TF-IDF vector and the all-ones query
    /// vector.
    ///
    /// Equal scores fall back to ascending document ID, so a rebuilt
    /// index answers identically. Truncating to a top-K is the caller's
    /// concern.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let terms = distinct_in_order(self.tokenizer.terms(query));
        if terms.is_empty() {
            return Vec::new();
        }

        // Any term without a directory entry empties the intersection
        // before a single line is decoded.
        if terms.iter().any(|term| !self.store.contains(term)) {
            return Vec::new();
        }

        let mut lists: Vec<PostingList> = Vec::with_capacity(terms.len());
        for term in &terms {
            match self.store.postings(term) {
                Ok(list) if list.is_empty() => return Vec::new(),
                Ok(list) => lists.push(list),
                Err(error) => {
                    tracing::warn!(term = %term, %error, "treating unreadable posting list as empty");
                    return Vec::new();
                }
            }
        }

        let common = intersect(&lists);
        if common.is_empty() {
            return Vec::new();
        }

        let query_norm = (terms.len() as f64).sqrt();
        let mut hits: Vec<SearchHit> = common
            .into_iter()
            .map(|doc_id| {
                let mut dot = 0.0;
                let mut norm_squared = 0.0;
                for list in &lists {
                    let weight = list.get(&doc_id).map_or(0.0, |posting| posting.tf_idf);
                    dot += weight;
                    norm_squared += weight * weight;
                }
                let score = dot / (norm_squared.sqrt() * query_norm + EPSILON);
                SearchHit { doc_id, score }
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        hits
    }
}

/// Distinct terms in first-appearance order. The order defines the
/// vector components; repeats add nothing to a conjunctive query.
fn distinct_in_order(terms: Vec<String>) -> Vec<String> {
    let mut seen = AHashSet::new();
    terms
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Documents present in every posting list, scanned from the smallest
/// list.
fn intersect(lists: &[PostingList]) -> Vec<DocId> {
    let Some(smallest) = lists.iter().min_by_key(|list| list.len()) else {
        return Vec::new();
    };
    smallest
        .keys()
        .filter(|doc_id| lists.iter().all(|list| list.contains_key(*doc_id)))
        .cloned()
        .collect()
}
