use async_trait::async_trait;

use crate::entities::{Roster, Watermark};

/// Durable roster storage. `load` degrades missing or unreadable content to
/// an empty roster; `save` either fully lands or leaves the prior content.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn load(&self) -> anyhow::Result<Roster>;
    async fn save(&self, roster: &Roster) -> anyhow::Result<()>;
}

/// Durable watermark storage, same degradation and atomicity contract as the
/// roster store. Absent content is `None`, never an error.
#[async_trait]
pub trait WatermarkRepository: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<Watermark>>;
    async fn save(&self, watermark: &Watermark) -> anyhow::Result<()>;
}
