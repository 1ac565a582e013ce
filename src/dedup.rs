//! Near-duplicate suppression: SimHash candidates confirmed by Jaccard.
//!
//! A 64-bit SimHash prunes candidates with a single popcount compare; a
//! Jaccard check on the raw token sets then eliminates SimHash false
//! positives. Only the most recently accepted documents are compared
//! against, which bounds memory and CPU — duplicates far apart in
//! ingestion order can both be accepted, and that is accepted behavior,
//! not a bug.

use ahash::AHashSet;
use std::collections::VecDeque;

/// Fingerprint and token set of one recently accepted document.
struct WindowEntry {
    fingerprint: u64,
    tokens: AHashSet<String>,
}

/// Two-stage near-duplicate filter over a bounded recency window.
pub struct NearDupDetector {
    window: VecDeque<WindowEntry>,
    capacity: usize,
    hamming_threshold: u32,
    jaccard_threshold: f64,
}

impl NearDupDetector {
    pub fn new(capacity: usize, hamming_threshold: u32, jaccard_threshold: f64) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            hamming_threshold,
            jaccard_threshold,
        }
    }

    /// Decide whether a document with these raw tokens duplicates a
    /// recently accepted one. Accepted documents enter the window,
    /// evicting the oldest entry once the window is full.
    pub fn is_duplicate(&mut self, tokens: &[String]) -> bool {
        let fingerprint = simhash(tokens.iter().map(String::as_str));
        let tokens: AHashSet<String> = tokens.iter().cloned().collect();

        for prior in &self.window {
            if (fingerprint ^ prior.fingerprint).count_ones() < self.hamming_threshold
                && jaccard(&tokens, &prior.tokens) > self.jaccard_threshold
            {
                return true;
            }
        }

        self.window.push_back(WindowEntry {
            fingerprint,
            tokens,
        });
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
        false
    }
}

/// Portable word hash: `h := h * 31 + byte (mod 2^64)` over the UTF-8
/// bytes, seed 0. Fixed so fingerprints are reproducible across
/// implementations; do not swap in a faster hasher.
fn word_hash(word: &str) -> u64 {
    word.bytes()
        .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// 64-bit SimHash over a token stream.
///
/// Each token hash votes +1/-1 per bit position; the fingerprint sets the
/// bits with a positive tally.
pub fn simhash<'a>(tokens: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut tally = [0i64; 64];
    for token in tokens {
        let hash = word_hash(token);
        for (bit, count) in tally.iter_mut().enumerate() {
            if hash >> bit & 1 == 1 {
                *count += 1;
            } else {
                *count -= 1;
            }
        }
    }
    tally
        .iter()
        .enumerate()
        .fold(0u64, |fingerprint, (bit, &count)| {
            if count > 0 {
                fingerprint | 1 << bit
            } else {
                fingerprint
            }
        })
}

/// Jaccard similarity of two token sets. Two empty sets are identical.
fn jaccard(a: &AHashSet<String>, b: &AHashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
