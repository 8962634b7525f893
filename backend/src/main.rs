//! Backend entry point: load configuration, wire the service graph, serve.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use rsvp_backend::server::{self, AppConfig};

/// Guest-list gated RSVP service.
#[derive(Debug, Parser)]
#[command(name = "rsvp-backend", version, about)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Override the listening port from the configuration.
    #[arg(long)]
    port: Option<u16>,
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config).map_err(io::Error::other)?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    server::run(config).await
}
