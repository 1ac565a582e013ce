//! Partial-segment spill files.
//!
//! A segment is a sequence of lines, each a single-key JSON object
//! `{"<term>": {"<url>": {"tf": n}, …}}`. Terms never repeat within one
//! segment; they may repeat across segments and are reconciled by the
//! merger. Empty lines are tolerated on the read side.

use crate::error::BuildError;
use crate::types::{DocId, RawPosting, RawPostingList, SegmentRecord};
use ahash::AHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Path of the partial segment with the given spill ordinal.
pub(crate) fn segment_path(index_dir: &Path, ordinal: usize) -> PathBuf {
    index_dir.join(format!("partial_index_{ordinal:04}.jsonl"))
}

/// Spill one drained accumulator index to `path`, one term per line.
///
/// Terms are written sorted so a segment's bytes depend only on its
/// contents. The caller guarantees the index is non-empty; an empty
/// segment is never written.
pub(crate) fn write_segment(
    path: &Path,
    index: AHashMap<String, AHashMap<DocId, u64>>,
) -> Result<(), BuildError> {
    let write_err = |source: std::io::Error| BuildError::SegmentWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    let mut terms: Vec<(String, AHashMap<DocId, u64>)> = index.into_iter().collect();
    terms.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (term, postings) in terms {
        let postings: RawPostingList = postings
            .into_iter()
            .map(|(doc_id, tf)| (doc_id, RawPosting { tf }))
            .collect();
        let record: SegmentRecord = [(term, postings)].into_iter().collect();
        serde_json::to_writer(&mut writer, &record).map_err(|e| write_err(e.into()))?;
        writer.write_all(b"\n").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)
}

/// Stream a segment's records into the merge fold, accumulating raw term
/// frequencies per `(term, doc)`.
pub(crate) fn read_segment(
    path: &Path,
    fold: &mut AHashMap<String, AHashMap<DocId, u64>>,
) -> Result<(), BuildError> {
    let file = File::open(path).map_err(|_| BuildError::SegmentMissing {
        path: path.to_path_buf(),
    })?;

    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| BuildError::SegmentRead {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: SegmentRecord =
            serde_json::from_str(&line).map_err(|source| BuildError::SegmentDecode {
                path: path.to_path_buf(),
                line: number + 1,
                source,
            })?;
        for (term, postings) in record {
            let slot = fold.entry(term).or_default();
            for (doc_id, posting) in postings {
                *slot.entry(doc_id).or_insert(0) += posting.tf;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::fs;
    use tempfile::TempDir;

    fn sample_index() -> AHashMap<String, AHashMap<DocId, u64>> {
        let mut index: AHashMap<String, AHashMap<DocId, u64>> = AHashMap::new();
        index
            .entry("beta".to_string())
            .or_default()
            .insert("B".to_string(), 1);
        index
            .entry("alpha".to_string())
            .or_default()
            .insert("A".to_string(), 2);
        index
            .entry("alpha".to_string())
            .or_default()
            .insert("B".to_string(), 1);
        index
    }

    #[test]
    fn writes_one_sorted_term_per_line() {
        let dir = TempDir::new().unwrap();
        let path = segment_path(dir.path(), 0);
        write_segment(&path, sample_index()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        check!(lines.len() == 2);
        check!(lines[0] == r#"{"alpha":{"A":{"tf":2},"B":{"tf":1}}}"#);
        check!(lines[1] == r#"{"beta":{"B":{"tf":1}}}"#);
    }

    #[test]
    fn read_folds_frequencies_across_segments() {
        let dir = TempDir::new().unwrap();
        let first = segment_path(dir.path(), 0);
        let second = segment_path(dir.path(), 1);
        write_segment(&first, sample_index()).unwrap();
        write_segment(&second, sample_index()).unwrap();

        let mut fold = AHashMap::new();
        read_segment(&first, &mut fold).unwrap();
        read_segment(&second, &mut fold).unwrap();

        check!(fold.get("alpha").unwrap().get("A") == Some(&4));
        check!(fold.get("alpha").unwrap().get("B") == Some(&2));
        check!(fold.get("beta").unwrap().get("B") == Some(&2));
    }

    #[test]
    fn read_tolerates_empty_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("segment.jsonl");
        fs::write(&path, "\n{\"alpha\":{\"A\":{\"tf\":1}}}\n\n").unwrap();

        let mut fold = AHashMap::new();
        read_segment(&path, &mut fold).unwrap();
        check!(fold.get("alpha").unwrap().get("A") == Some(&1));
    }

    #[test]
    fn missing_segment_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut fold = AHashMap::new();
        let err = read_segment(&dir.path().join("gone.jsonl"), &mut fold).unwrap_err();
        check!(matches!(err, BuildError::SegmentMissing { .. }));
    }

    #[test]
    fn malformed_line_is_fatal_and_numbered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("segment.jsonl");
        fs::write(&path, "{\"alpha\":{\"A\":{\"tf\":1}}}\n{broken\n").unwrap();

        let mut fold = AHashMap::new();
        let err = read_segment(&path, &mut fold).unwrap_err();
        match err {
            BuildError::SegmentDecode { line, .. } => {
                check!(line == 2);
            }
            other => panic!("expected SegmentDecode, got {other:?}"),
        }
    }
}
