// Steam Web API nickname resolution

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use roster_domain::{LookupError, NicknameResolver, RuntimeConfig, SteamId};

const PLAYER_SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";

pub struct SteamWebApiResolver {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SteamWebApiResolver {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let api_key = config
            .steam_api_key
            .clone()
            .ok_or_else(|| anyhow!("steam_api_key is not configured"))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
            .build()?;
        Ok(Self {
            client,
            base_url: config.steam_api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl NicknameResolver for SteamWebApiResolver {
    async fn resolve(&self, steam_id: &SteamId) -> Result<String, LookupError> {
        let url = format!("{}{}", self.base_url, PLAYER_SUMMARIES_PATH);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("steamids", steam_id.as_str())])
            .send()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;
        persona_from_body(&body, steam_id)
    }
}

#[derive(Debug, Deserialize)]
struct PlayerSummariesBody {
    response: PlayerSummariesResponse,
}

#[derive(Debug, Deserialize)]
struct PlayerSummariesResponse {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Deserialize)]
struct PlayerSummary {
    personaname: String,
}

/// A body without the expected player entry is a lookup failure, same as a
/// transport error: it must be retried, never stored as a placeholder.
fn persona_from_body(body: &str, steam_id: &SteamId) -> Result<String, LookupError> {
    let parsed: PlayerSummariesBody =
        serde_json::from_str(body).map_err(|_| LookupError::MissingPlayer(steam_id.clone()))?;
    parsed
        .response
        .players
        .into_iter()
        .next()
        .map(|player| player.personaname)
        .ok_or_else(|| LookupError::MissingPlayer(steam_id.clone()))
}
