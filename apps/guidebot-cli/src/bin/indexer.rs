use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;

use guidebot_cli::{build_pipeline, build_store, load_if_present, load_settings, logging};
use guidebot_core::chunker::{ChunkingConfig, TextSplitter};
use guidebot_core::config::expand_path;
use guidebot_sources::collect_documents;
use guidebot_vector::SharedStore;

#[derive(Parser, Debug)]
#[command(name = "guidebot-indexer", about = "Fetch the city catalogue, chunk it and build the vector index")]
struct Cli {
    /// Configuration environment (selects config.<env>.toml).
    #[arg(long, env = "RUST_ENV", default_value = "dev")]
    env: String,

    /// Append to the existing index instead of rebuilding it.
    #[arg(long)]
    append: bool,

    /// After indexing, answer questions read from stdin until `exit`.
    #[arg(long, short)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    let settings = load_settings(&cli.env)?;
    let ingest = &settings.ingest;

    println!("Tourism Guide Indexer\n=====================");
    let base_dir = expand_path(&ingest.base_dir);
    let docs = collect_documents(&ingest.cities, &base_dir).await?;
    if docs.is_empty() {
        bail!("No documents collected from {} configured cities; check ingest.cities and ingest.base_dir", ingest.cities.len());
    }
    println!("📄 Collected {} documents", docs.len());

    let splitter = TextSplitter::new(ChunkingConfig { chunk_size: ingest.chunk_size, chunk_overlap: ingest.chunk_overlap })?;
    let chunks = splitter.chunk_documents(&docs);
    println!("✂️  Split into {} chunks", chunks.len());

    let mut store = build_store(&settings)?;
    if cli.append && !load_if_present(&mut store)? {
        println!("⚠️  No existing index to append to; building a fresh one");
    }
    store.build_index(chunks, !cli.append)?;
    store.save(None, None)?;
    println!("\n✅ Indexed {} chunks", store.len());
    println!("📦 Index: {}", store.index_path().display());
    println!("📦 Metadata: {}", store.meta_path().display());

    if cli.interactive {
        let shared = SharedStore::new(store);
        let pipeline = build_pipeline(&settings, Arc::new(shared))?;
        println!("\nAsk a question (type 'exit' to quit)");
        let stdin = io::stdin();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let question = line.trim();
            if question.eq_ignore_ascii_case("exit") {
                break;
            }
            if question.is_empty() {
                continue;
            }
            let outcome = pipeline.answer(question).await;
            println!("\n{}\n", outcome.response);
        }
    }
    Ok(())
}
