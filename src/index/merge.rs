//! Merge partial segments into the final TF-IDF index.
//!
//! The whole merged vocabulary is folded in memory; at the corpus scale
//! this system targets, the aggregate of all segments fits comfortably.
//! A larger-than-memory corpus would call for sorting each segment by
//! term and running a heap-ordered k-way merge instead, emitting the same
//! record shape.

use super::segment;
use crate::error::BuildError;
use crate::types::{DocId, IndexRecord, Posting, PostingList};
use ahash::AHashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the final index inside an index directory.
pub const FINAL_INDEX_FILE: &str = "final_index.jsonl";

/// Per-posting weight: `(1 + log10(tf)) · log10(n / df)`.
///
/// `tf ≥ 1` and `df ≤ n` always hold here, so the weight is never
/// negative; a term present in every document weighs zero everywhere.
fn tf_idf(tf: u64, df: usize, total_docs: usize) -> f64 {
    let sublinear_tf = 1.0 + (tf as f64).log10();
    let idf = (total_docs as f64 / df as f64).log10();
    sublinear_tf * idf
}

/// Fold every partial segment into one map, weight each posting, and
/// write the final index. Returns the number of distinct terms written.
///
/// Lines are written in sorted term order, which is stable within a run
/// (as the offset directory requires) and also byte-identical across
/// reruns over the same corpus.
pub(crate) fn merge_segments(
    index_dir: &Path,
    segments: &[PathBuf],
    df: &AHashMap<String, u64>,
    total_docs: usize,
) -> Result<usize, BuildError> {
    let mut fold: AHashMap<String, AHashMap<DocId, u64>> = AHashMap::new();
    for path in segments {
        segment::read_segment(path, &mut fold)?;
    }

    let mut terms: Vec<(String, AHashMap<DocId, u64>)> = fold.into_iter().collect();
    terms.sort_by(|(a, _), (b, _)| a.cmp(b));

    let path = index_dir.join(FINAL_INDEX_FILE);
    let write_err = |source: std::io::Error| BuildError::FinalWrite {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    let term_count = terms.len();
    for (term, postings) in terms {
        let Some(&df_count) = df.get(&term) else {
            return Err(BuildError::DocFrequencyMissing { term });
        };
        // Each document contributes one posting per term, so the merged
        // list length is this term's document frequency.
        let doc_freq = postings.len();
        debug_assert_eq!(df_count as usize, doc_freq);

        let list: PostingList = postings
            .into_iter()
            .map(|(doc_id, tf)| {
                let weight = tf_idf(tf, doc_freq, total_docs);
                (doc_id, Posting { tf, tf_idf: weight })
            })
            .collect();
        let record: IndexRecord = [(term, list)].into_iter().collect();
        serde_json::to_writer(&mut writer, &record).map_err(|e| write_err(e.into()))?;
        writer.write_all(b"\n").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    tracing::info!(
        terms = term_count,
        docs = total_docs,
        path = %path.display(),
        "merged final index"
    );
    Ok(term_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn spill(dir: &Path, ordinal: usize, entries: &[(&str, &str, u64)]) -> PathBuf {
        let mut index: AHashMap<String, AHashMap<DocId, u64>> = AHashMap::new();
        for (term, doc, tf) in entries {
            index
                .entry((*term).to_string())
                .or_default()
                .insert((*doc).to_string(), *tf);
        }
        let path = segment::segment_path(dir, ordinal);
        segment::write_segment(&path, index).unwrap();
        path
    }

    fn df_map(entries: &[(&str, u64)]) -> AHashMap<String, u64> {
        entries
            .iter()
            .map(|(term, count)| ((*term).to_string(), *count))
            .collect()
    }

    #[rstest]
    #[case(1, 1, 2, 0.301_029_995_663_981_2)] // tf=1, df=1, n=2 → log10(2)
    #[case(10, 1, 10, 2.0)] // (1 + 1) · 1
    #[case(5, 2, 2, 0.0)] // df = n → idf = 0
    fn weight_formula(#[case] tf: u64, #[case] df: usize, #[case] n: usize, #[case] expected: f64) {
        check!((tf_idf(tf, df, n) - expected).abs() < 1e-12);
    }

    #[test]
    fn merge_accumulates_tf_across_segments_and_weights_postings() {
        let dir = TempDir::new().unwrap();
        let segments = vec![
            spill(dir.path(), 0, &[("alpha", "A", 2), ("beta", "A", 1)]),
            spill(dir.path(), 1, &[("alpha", "A", 1), ("alpha", "B", 1)]),
        ];
        let df = df_map(&[("alpha", 2), ("beta", 1)]);

        let terms = merge_segments(dir.path(), &segments, &df, 2).unwrap();
        check!(terms == 2);

        let text = fs::read_to_string(dir.path().join(FINAL_INDEX_FILE)).unwrap();
        let lines: Vec<IndexRecord> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        check!(lines.len() == 2);

        let alpha = lines[0].get("alpha").unwrap();
        check!(alpha.get("A").unwrap().tf == 3);
        check!(alpha.get("A").unwrap().tf_idf == 0.0); // df = n
        let beta = lines[1].get("beta").unwrap();
        check!(beta.get("A").unwrap().tf == 1);
        check!((beta.get("A").unwrap().tf_idf - 2.0f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn term_without_df_entry_aborts_the_merge() {
        let dir = TempDir::new().unwrap();
        let segments = vec![spill(dir.path(), 0, &[("ghost", "A", 1)])];
        let df = df_map(&[]);

        let err = merge_segments(dir.path(), &segments, &df, 1).unwrap_err();
        check!(matches!(err, BuildError::DocFrequencyMissing { .. }));
    }

    #[test]
    fn no_segments_yield_an_empty_final_index() {
        let dir = TempDir::new().unwrap();
        let terms = merge_segments(dir.path(), &[], &df_map(&[]), 0).unwrap();
        check!(terms == 0);
        let text = fs::read_to_string(dir.path().join(FINAL_INDEX_FILE)).unwrap();
        check!(text.is_empty());
    }
}
