use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs;

use roster_application::{AppState, Metrics};
use roster_infrastructure::{
    AppConfig, JsonRosterRepository, JsonWatermarkRepository, SteamWebApiResolver,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    /// Wire configuration and adapters into the shared state. Anything that
    /// fails here (unreadable config, uncreatable data directory, missing
    /// API key) is a startup failure and terminates the process.
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();

        ensure_parent_dir(&runtime_config.roster_path).await?;
        ensure_parent_dir(&runtime_config.watermark_path).await?;

        let resolver = Arc::new(SteamWebApiResolver::new(&runtime_config)?);

        let state = AppState {
            roster_repo: Arc::new(JsonRosterRepository::new(&runtime_config.roster_path)),
            watermark_repo: Arc::new(JsonWatermarkRepository::new(&runtime_config.watermark_path)),
            resolver,
            metrics: Arc::new(Metrics::default()),
            config: runtime_config,
        };

        Ok(Self { state })
    }
}

async fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}
