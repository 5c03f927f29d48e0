use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use roster_domain::RuntimeConfig;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_path: String,
    pub roster_path: String,
    pub watermark_path: String,
    pub steam_api_url: String,
    pub steam_api_key: Option<String>,
    pub scan_interval_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: "/home/vhserver/log/console/vhserver-console.log".to_string(),
            roster_path: "./data/player_info.json".to_string(),
            watermark_path: "./data/last_check_time.json".to_string(),
            steam_api_url: "https://api.steampowered.com".to_string(),
            steam_api_key: None,
            scan_interval_seconds: 600,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("ROSTER_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_key) = &self.steam_api_key {
            if api_key.trim().is_empty() {
                self.steam_api_key = None;
            }
        }
        self.steam_api_url = self.steam_api_url.trim_end_matches('/').to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.log_path = resolve_path(base, &self.log_path);
        self.roster_path = resolve_path(base, &self.roster_path);
        self.watermark_path = resolve_path(base, &self.watermark_path);
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_path.trim().is_empty() {
            return Err(anyhow!("log_path must not be empty"));
        }
        if self.steam_api_url.trim().is_empty() {
            return Err(anyhow!("steam_api_url must not be empty"));
        }
        if self.scan_interval_seconds == 0 {
            return Err(anyhow!("scan_interval_seconds must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            log_path: self.log_path.clone(),
            roster_path: self.roster_path.clone(),
            watermark_path: self.watermark_path.clone(),
            steam_api_url: self.steam_api_url.clone(),
            steam_api_key: self.steam_api_key.clone(),
            scan_interval_seconds: self.scan_interval_seconds,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ROSTER_LOG_PATH") {
            self.log_path = value;
        }
        if let Ok(value) = env::var("ROSTER_ROSTER_PATH") {
            self.roster_path = value;
        }
        if let Ok(value) = env::var("ROSTER_WATERMARK_PATH") {
            self.watermark_path = value;
        }
        if let Ok(value) = env::var("ROSTER_STEAM_API_URL") {
            self.steam_api_url = value;
        }
        if let Ok(value) = env::var("ROSTER_STEAM_API_KEY") {
            self.steam_api_key = Some(value);
        }
        if let Ok(value) = env::var("ROSTER_SCAN_INTERVAL_SECONDS") {
            self.scan_interval_seconds = value.parse().unwrap_or(self.scan_interval_seconds);
        }
        if let Ok(value) = env::var("ROSTER_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
