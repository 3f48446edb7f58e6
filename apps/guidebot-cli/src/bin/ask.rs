use std::sync::Arc;

use anyhow::bail;
use clap::Parser;

use guidebot_cli::{build_pipeline, load_settings, logging, open_store};

#[derive(Parser, Debug)]
#[command(name = "guidebot-ask", about = "Answer one question with the same pipeline the server uses")]
struct Cli {
    /// Configuration environment (selects config.<env>.toml).
    #[arg(long, env = "RUST_ENV", default_value = "dev")]
    env: String,

    /// Number of chunks to retrieve; overrides retrieval.top_k.
    #[arg(long, short = 'k')]
    top_k: Option<usize>,

    /// Print which path produced the answer.
    #[arg(long, short)]
    verbose: bool,

    question: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    let question = cli.question.join(" ");
    if question.trim().is_empty() {
        bail!("Usage: guidebot-ask '<question>'");
    }

    let mut settings = load_settings(&cli.env)?;
    if let Some(k) = cli.top_k {
        settings.retrieval.top_k = k.max(1);
    }
    let store = open_store(&settings)?;
    let pipeline = build_pipeline(&settings, Arc::new(store))?;

    let outcome = pipeline.answer(&question).await;
    if cli.verbose {
        println!("[{:?}]", outcome.resolution);
    }
    println!("{}", outcome.response);
    Ok(())
}
