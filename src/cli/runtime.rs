use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GatewayConfig;

pub fn init_logging(level: &str, debug: bool, json: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}

pub struct LoadedConfig {
    pub config: GatewayConfig,
    pub path: PathBuf,
}

/// Candidate config location when `--config` is absent.
pub fn default_config_path() -> Result<PathBuf> {
    // Priority: ./config/gateway.yaml > ~/.config/analytics-gateway/gateway.yaml
    let local_config = PathBuf::from("config/gateway.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("analytics-gateway");
    path.push("gateway.yaml");
    Ok(path)
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let mut config = if config_path.exists() {
        let loaded = read_config(&config_path).await?;
        info!(path = %config_path.display(), "Loaded configuration");
        loaded
    } else {
        warn!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        GatewayConfig::default()
    };

    config
        .apply_env_overrides()
        .context("Invalid environment override")?;
    config.validate().context("Invalid gateway configuration")?;

    Ok(LoadedConfig {
        config,
        path: config_path,
    })
}

async fn read_config(path: &Path) -> Result<GatewayConfig> {
    let content = fs::read_to_string(path)
        .await
        .context("Failed to read config file")?;
    serde_yaml::from_str(&content).context("Failed to parse config file")
}
