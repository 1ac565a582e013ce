//! Build-time configuration.

/// Tunables for the index builder.
///
/// The spill triggers bound peak memory during the build: a spill happens
/// after `chunk_size` documents or as soon as the accumulator holds
/// `token_ceiling` distinct terms, whichever comes first. The remaining
/// knobs control near-duplicate suppression.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Documents processed between partial-index spills.
    pub chunk_size: usize,
    /// Distinct-term count that forces an early spill.
    pub token_ceiling: usize,
    /// How many recently accepted documents a new fingerprint is compared
    /// against. Zero disables near-duplicate detection.
    pub simhash_window: usize,
    /// Hamming-distance cutoff below which a prior document becomes a
    /// Jaccard candidate.
    pub simhash_hamming_threshold: u32,
    /// Jaccard similarity above which a candidate is rejected as a
    /// near-duplicate.
    pub jaccard_threshold: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            token_ceiling: 50_000,
            simhash_window: 200,
            simhash_hamming_threshold: 8,
            jaccard_threshold: 0.85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn defaults_match_documented_triggers() {
        let config = BuildConfig::default();
        check!(config.chunk_size == 500);
        check!(config.token_ceiling == 50_000);
        check!(config.simhash_window == 200);
        check!(config.simhash_hamming_threshold == 8);
        check!(config.jaccard_threshold == 0.85);
    }
}
