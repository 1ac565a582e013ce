use clap::Parser;
use std::fs;
use webdex::cli::{Cli, Commands};
use webdex::{BuildConfig, FINAL_INDEX_FILE, IndexStore, QueryEngine};

fn main() {
    webdex::tracing::init();

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> webdex::Result<()> {
    match cli.command {
        Commands::Build {
            corpus_dir,
            index_dir,
            chunk_size,
            token_ceiling,
            simhash_window,
            hamming_threshold,
            jaccard_threshold,
        } => {
            let config = BuildConfig {
                chunk_size,
                token_ceiling,
                simhash_window,
                simhash_hamming_threshold: hamming_threshold,
                jaccard_threshold,
            };
            let stats = webdex::build(&corpus_dir, &index_dir, &config)?;
            println!(
                "Indexed {} documents into {} terms ({} near-duplicates skipped, {} unreadable files skipped, {} segments merged).",
                stats.docs_indexed,
                stats.distinct_terms,
                stats.near_duplicates,
                stats.unreadable_files,
                stats.segments
            );
        }
        Commands::Search {
            index_dir,
            query,
            limit,
        } => {
            let store = IndexStore::open(&index_dir.join(FINAL_INDEX_FILE))?;
            let engine = QueryEngine::new(&store);
            let hits = engine.search(&query);
            if hits.is_empty() {
                println!("No results.");
            }
            for (rank, hit) in hits.iter().take(limit).enumerate() {
                println!("{:>2}. {}  (score {:.4})", rank + 1, hit.doc_id, hit.score);
            }
        }
        Commands::Stats { index_dir } => {
            let path = index_dir.join(FINAL_INDEX_FILE);
            let store = IndexStore::open(&path)?;
            let bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            println!("index:  {}", path.display());
            println!("terms:  {}", store.term_count());
            println!("bytes:  {bytes}");
        }
    }
    Ok(())
}
