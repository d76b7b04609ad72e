use crate::cli::commands::{Cli, Commands};
use anyhow::Result;
use phiscribe::Config;
use phiscribe::gateway;
use std::sync::Arc;

use crate::app::status::render_status;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            tracing::info!(%host, port, provider = %config.llm.provider, "starting gateway");
            gateway::run_gateway(&host, port, Arc::new(config)).await
        }
        Commands::CheckConfig => {
            println!("{}", render_status(&config));
            Ok(())
        }
    }
}
