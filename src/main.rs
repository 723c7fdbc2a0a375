//! Shopping list server binary.

use anyhow::{Context, Result};
use clap::Parser;
use shoplist::server;
use shoplist::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Collaborative shopping list server with live updates.
#[derive(Parser, Debug)]
#[command(name = "shoplist", version, about)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides the config file).
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Log level used when RUST_LOG is unset (overrides the config file).
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match args.config {
        Some(ref path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&config.log_level);

    tracing::info!(bind = %config.bind, subscriber_buffer = config.subscriber_buffer, "starting");

    server::serve(config).await.context("server failed")?;
    Ok(())
}
