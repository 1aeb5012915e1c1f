use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audioserver::{AppState, Config, create_router};

#[derive(Parser, Debug)]
#[command(name = "audioserver")]
#[command(about = "Minimal static audio file server")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "AUDIOSERVER_PORT", default_value = "8080")]
    port: u16,

    /// Address to bind to
    #[arg(short, long, env = "AUDIOSERVER_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Directory to serve audio files from (overrides the config file)
    #[arg(short, long, env = "AUDIOSERVER_ROOT")]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "AUDIOSERVER_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "AUDIOSERVER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "audioserver=debug,tower_http=debug"
    } else {
        "audioserver=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from file if provided, otherwise use defaults
    let mut config = match &cli.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.audio_dir = root.clone();
    }

    let root_dir = config
        .audio_dir
        .canonicalize()
        .unwrap_or_else(|_| config.audio_dir.clone());

    if !root_dir.exists() {
        bail!("Audio directory does not exist: {}", root_dir.display());
    }

    if !root_dir.is_dir() {
        bail!("Audio path is not a directory: {}", root_dir.display());
    }

    info!(
        "Serving audio from {} (formats: {})",
        root_dir.display(),
        config.extensions().join(", ")
    );

    let state = AppState::with_config(root_dir, config);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cli.bind, cli.port))?;
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
