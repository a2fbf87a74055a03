use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use super::env::CliArgs;
use super::runtime::{init_logging, load_config, LoadedConfig};
use crate::server;

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug, cli.json_logs)?;

    info!("Starting analytics-gateway v{}", env!("CARGO_PKG_VERSION"));

    let LoadedConfig { mut config, path } = load_config(cli.config.as_ref()).await?;
    if let Some(http) = cli.http {
        config.http.listen = http;
    }
    info!(
        config = %path.display(),
        listen = %config.http.listen,
        callers = config.callers.len(),
        projects = config.projects.len(),
        "Configuration ready"
    );

    match server::serve(config).await {
        Ok(()) => {
            info!("Gateway stopped");
            Ok(())
        }
        Err(err) => {
            error!("Gateway failed: {:#}", err);
            Err(err)
        }
    }
}
