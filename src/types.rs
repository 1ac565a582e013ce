//! Posting types shared by the build and query paths.
//!
//! Two posting shapes exist on disk: partial segments carry raw term
//! frequencies only, while the final index carries the TF-IDF weight next
//! to each frequency. Both are one-key-per-line JSON records, so a record
//! decodes standalone at any byte offset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document identifier: the canonical URL of a crawled page (or its
/// filesystem path when the crawl record carried no URL).
pub type DocId = String;

/// A posting as written to a partial segment: raw term frequency only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPosting {
    pub tf: u64,
}

/// A posting in the final index.
///
/// `tf_idf` defaults to zero on decode so the merger can also read final
/// records, but every final line is written with both fields present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub tf: u64,
    #[serde(default)]
    pub tf_idf: f64,
}

/// Posting list for one term inside a partial segment.
pub type RawPostingList = BTreeMap<DocId, RawPosting>;

/// Posting list for one term in the final index. Document IDs are kept
/// sorted so a rerun over the same corpus writes identical bytes.
pub type PostingList = BTreeMap<DocId, Posting>;

/// The single-key object on one partial-segment line:
/// `{"<term>": {"<url>": {"tf": n}, …}}`.
pub type SegmentRecord = BTreeMap<String, RawPostingList>;

/// The single-key object on one final-index line:
/// `{"<term>": {"<url>": {"tf": n, "tf_idf": w}, …}}`.
pub type IndexRecord = BTreeMap<String, PostingList>;
