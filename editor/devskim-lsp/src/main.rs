//! DevSkim Language Server executable
//!
//! Speaks LSP over stdio; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use devskim_lsp::{DevSkimServer, EngineAnalyzer, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tower_lsp::{LspService, Server};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "devskim-lsp",
    version,
    about = "DevSkim security analysis language server"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Accepted for editor compatibility; stdio is the only transport
    #[arg(long)]
    stdio: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            Ok(ServerConfig::load_default(&cwd))
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging before reading the config so its warnings are kept
    let (filter, filter_handle) = reload::Layer::new(log_filter("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    if let Err(e) = filter_handle.reload(log_filter(&config.engine.log_level)) {
        tracing::warn!("Keeping default log level: {}", e);
    }

    tracing::info!("Starting DevSkim Language Server");

    let processor = config
        .analysis
        .build_processor()
        .context("building rule processor")?;
    let analyzer = Arc::new(EngineAnalyzer::new(processor));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(|client| DevSkimServer::new(client, analyzer, config));
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
