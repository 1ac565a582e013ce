//! Memory-mapped access to the final index.
//!
//! `open` maps the index file read-only and scans it once, recording the
//! byte range of every line and the term key at its head. Lookups
//! afterwards slice the mapping at the recorded range and decode just
//! that line, so only the touched lines are ever paged in — the file is
//! never loaded wholesale. Every lookup takes its own subslice, so
//! concurrent lookups share no cursor.

use crate::error::StoreError;
use crate::types::{IndexRecord, PostingList};
use ahash::AHashMap;
use memmap2::Mmap;
use serde::Deserialize;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Byte range of one record line inside the mapping.
#[derive(Debug, Clone, Copy)]
struct LineSpan {
    offset: usize,
    len: usize,
}

/// Read-only view over a final index file.
#[derive(Debug)]
pub struct IndexStore {
    mmap: Option<Mmap>,
    directory: AHashMap<String, LineSpan>,
}

impl IndexStore {
    /// Open `path` and build the term directory.
    ///
    /// A missing file surfaces as [`StoreError::IndexNotBuilt`], distinct
    /// from an index that exists but has no matching terms. Lines whose
    /// leading key cannot be parsed are logged and left out of the
    /// directory; they do not prevent the open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreError::IndexNotBuilt {
                    path: path.to_path_buf(),
                }
            } else {
                io_err(source)
            }
        })?;
        // Safety: the index file is written once per build and read-only
        // afterwards; no writer exists while it is mapped.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;

        let mut directory = AHashMap::new();
        let mut offset = 0usize;
        for line in mmap.split(|&byte| byte == b'\n') {
            if !line.is_empty() {
                match record_term(line) {
                    Some(term) => {
                        directory.insert(
                            term,
                            LineSpan {
                                offset,
                                len: line.len(),
                            },
                        );
                    }
                    None => {
                        tracing::warn!(offset, "index line with unreadable term key, skipping");
                    }
                }
            }
            offset += line.len() + 1;
        }

        tracing::debug!(
            terms = directory.len(),
            bytes = mmap.len(),
            path = %path.display(),
            "opened index"
        );
        Ok(Self {
            mmap: Some(mmap),
            directory,
        })
    }

    /// Posting list for `term`, or an empty list when the term is absent.
    ///
    /// Absent terms are answered from the directory alone and never touch
    /// the mapping. Present terms cost one line decode at the stored
    /// offset; a line that no longer decodes is index corruption.
    pub fn postings(&self, term: &str) -> Result<PostingList, StoreError> {
        let mmap = self.mmap.as_ref().ok_or(StoreError::Closed)?;
        let Some(span) = self.directory.get(term) else {
            return Ok(PostingList::new());
        };

        let line = &mmap[span.offset..span.offset + span.len];
        let corrupt = || StoreError::Corrupt {
            term: term.to_string(),
        };
        let mut record: IndexRecord = serde_json::from_slice(line).map_err(|_| corrupt())?;
        record.remove(term).ok_or_else(corrupt)
    }

    /// Whether `term` has a directory entry. No I/O.
    pub fn contains(&self, term: &str) -> bool {
        self.directory.contains_key(term)
    }

    /// Number of terms in the directory.
    pub fn term_count(&self) -> usize {
        self.directory.len()
    }

    /// Release the mapping and the directory. Idempotent; lookups after
    /// closing fail with [`StoreError::Closed`].
    pub fn close(&mut self) {
        self.mmap = None;
        self.directory = AHashMap::new();
    }
}

/// Parse the term key from the head of a record line without decoding the
/// posting list. Directory construction only needs the key; the full
/// decode is deferred to the lookup that actually wants the line.
fn record_term(line: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(line).ok()?;
    let rest = text.trim_start().strip_prefix('{')?;
    let mut de = serde_json::Deserializer::from_str(rest.trim_start());
    String::deserialize(&mut de).ok()
}
