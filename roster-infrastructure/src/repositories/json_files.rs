// JSON file adapters for the roster and watermark stores. Reads degrade to
// "absent" on any failure; writes go through a sibling temp file and a
// rename, so a crash never leaves a truncated store behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::warn;

use roster_domain::{PlayerRecord, Roster, RosterRepository, Watermark, WatermarkRepository};

pub struct JsonRosterRepository {
    path: PathBuf,
}

impl JsonRosterRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterRepository for JsonRosterRepository {
    async fn load(&self) -> Result<Roster> {
        let records: Option<Vec<PlayerRecord>> = read_json(&self.path).await;
        Ok(records.map(Roster::from_records).unwrap_or_default())
    }

    async fn save(&self, roster: &Roster) -> Result<()> {
        write_json_atomic(&self.path, &roster.to_records()).await
    }
}

pub struct JsonWatermarkRepository {
    path: PathBuf,
}

impl JsonWatermarkRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WatermarkRepository for JsonWatermarkRepository {
    async fn load(&self) -> Result<Option<Watermark>> {
        Ok(read_json(&self.path).await)
    }

    async fn save(&self, watermark: &Watermark) -> Result<()> {
        write_json_atomic(&self.path, watermark).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!(path = %path.display(), "store read failed, treating as absent: {err}");
            return None;
        }
    };
    if content.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), "store content unparsable, treating as absent: {err}");
            None
        }
    }
}

async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let content = serde_json::to_string_pretty(value)?;
    let tmp_path = tmp_sibling(path);
    fs::write(&tmp_path, content)
        .await
        .with_context(|| format!("writing {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("committing {}", path.display()))?;
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".tmp");
    path.with_file_name(name)
}
