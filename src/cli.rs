use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "webdex")]
#[command(about = "Build and query a TF-IDF index over crawled web pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index from a directory of crawl records.
    Build {
        /// Directory tree of crawled pages ({"url", "content"} JSON files).
        corpus_dir: PathBuf,
        /// Output directory; recreated from scratch.
        index_dir: PathBuf,
        /// Documents per partial-index spill.
        #[arg(long, default_value = "500")]
        chunk_size: usize,
        /// Distinct-term count that forces an early spill.
        #[arg(long, default_value = "50000")]
        token_ceiling: usize,
        /// Recently accepted documents compared for near-duplicates.
        #[arg(long, default_value = "200")]
        simhash_window: usize,
        /// Hamming-distance cutoff for SimHash candidates.
        #[arg(long, default_value = "8")]
        hamming_threshold: u32,
        /// Jaccard similarity above which a candidate is a duplicate.
        #[arg(long, default_value = "0.85")]
        jaccard_threshold: f64,
    },
    /// Run a conjunctive query against a built index.
    Search {
        /// Index directory produced by `build`.
        index_dir: PathBuf,
        query: String,
        /// Results shown.
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
    /// Print statistics for a built index.
    Stats {
        /// Index directory produced by `build`.
        index_dir: PathBuf,
    },
}
