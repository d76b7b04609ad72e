use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `phiscribe` - PHI-safe clinical note assistant gateway.
#[derive(Parser, Debug)]
#[command(name = "phiscribe")]
#[command(version)]
#[command(about = "De-identifying gateway for AI clinical note generation.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.phiscribe/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (default: [gateway] host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load and validate the config, then print a summary
    CheckConfig,
}
