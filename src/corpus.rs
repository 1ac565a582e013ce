//! Crawl corpus scanning and decoding.
//!
//! A corpus is a directory tree of JSON files, each holding one crawled
//! page. Records missing a `url` fall back to their filesystem path as
//! the document ID; records missing `content` are empty-HTML documents
//! that still count toward the corpus size. Entries that cannot be read
//! or decoded at all are logged, counted, and skipped — a bad page never
//! aborts a build.

use anyhow::Context;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use walkdir::WalkDir;

/// One crawled page as stored on disk.
#[derive(Debug, Deserialize)]
struct CrawlRecord {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// A decoded document ready for indexing.
#[derive(Debug)]
pub struct CorpusDoc {
    pub doc_id: String,
    pub html: String,
}

/// Walk `corpus_dir` recursively, yielding every decodable crawl record.
///
/// Entries are visited in file-name order so a rebuild over the same
/// corpus ingests documents identically. Every entry that is skipped —
/// unreadable directory entries and undecodable records alike — bumps
/// `unreadable` once.
pub fn scan<'a>(
    corpus_dir: &Path,
    unreadable: &'a mut usize,
) -> impl Iterator<Item = CorpusDoc> + 'a {
    WalkDir::new(corpus_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) if entry.file_type().is_file() => entry,
                Ok(_) => return None,
                Err(error) => {
                    tracing::warn!(%error, "unreadable corpus entry, skipping");
                    *unreadable += 1;
                    return None;
                }
            };
            match read_doc(entry.path()) {
                Ok(doc) => Some(doc),
                Err(error) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = format!("{error:#}"),
                        "undecodable crawl record, skipping"
                    );
                    *unreadable += 1;
                    None
                }
            }
        })
}

fn read_doc(path: &Path) -> crate::error::Result<CorpusDoc> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let record: CrawlRecord = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(CorpusDoc {
        doc_id: record
            .url
            .unwrap_or_else(|| path.display().to_string()),
        html: record.content.unwrap_or_default(),
    })
}
