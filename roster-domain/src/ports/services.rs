use async_trait::async_trait;
use thiserror::Error;

use crate::value_objects::SteamId;

/// Nickname resolution failure. Always recoverable at the scan level: the
/// scan aborts, nothing is persisted, and the same sighting is retried on
/// the next cycle. A failure must never be stored as a placeholder name.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("nickname request failed: {0}")]
    Transport(String),
    #[error("nickname service responded with status {0}")]
    Status(u16),
    #[error("no player data in response for {0}")]
    MissingPlayer(SteamId),
}

#[async_trait]
pub trait NicknameResolver: Send + Sync {
    async fn resolve(&self, steam_id: &SteamId) -> Result<String, LookupError>;
}
