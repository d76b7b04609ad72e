#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use anyhow::{Context, Result};
use clap::Parser;
use phiscribe::Config;
use tracing_subscriber::FmtSubscriber;

mod app;
mod cli;

use cli::commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load_or_init(),
    }
    .context("load configuration")?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.logging.max_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("install tracing subscriber")?;

    app::dispatch::dispatch(cli, config).await
}
