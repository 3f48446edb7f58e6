use std::sync::Arc;

use clap::Parser;

use guidebot_cli::{build_pipeline, load_settings, logging, open_store};
use guidebot_server::{serve, AppState};

#[derive(Parser, Debug)]
#[command(name = "guidebot-server", about = "HTTP API for the tourism question-answering pipeline")]
struct Cli {
    /// Configuration environment (selects config.<env>.toml).
    #[arg(long, env = "RUST_ENV", default_value = "dev")]
    env: String,

    /// Address to bind (host:port); overrides server.bind.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    let settings = load_settings(&cli.env)?;

    let store = open_store(&settings)?;
    tracing::info!(chunks = store.len(), initialized = store.is_initialized(), "vector store ready");
    let pipeline = build_pipeline(&settings, Arc::new(store.clone()))?;
    let state = Arc::new(AppState::new(pipeline, store, settings.server.banner.clone()));

    let bind = cli.bind.unwrap_or_else(|| settings.server.bind.clone());
    serve(state, &bind, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!("shutting down");
}
