//! Willpower Forge CLI - track "I will / I won't / I want" goals from the terminal.
//!
//! Sessions persist between runs; protected commands go through the same
//! route guard the web front-end uses.

mod app;
mod cli;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::Cli;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    info!("Willpower Forge CLI starting");

    let mut app = App::new(cli.api_url)?;
    app.run(cli.command).await
}
