use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::error::FetchError;
use super::models::GameRecord;
use super::normalize::parse_body;

/// Anything that can hand the board today's slate.
#[async_trait]
pub trait SlateSource: Send + Sync {
    /// Fetch the full slate. Each call is an independent request.
    async fn fetch_games(&self) -> Result<Vec<GameRecord>, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Slate source backed by the projection API's `/api/games/today` endpoint.
pub struct HttpSlateSource {
    http: Client,
    url: String,
}

impl HttpSlateSource {
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpSlateSource {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl SlateSource for HttpSlateSource {
    fn name(&self) -> &str {
        "projection-api"
    }

    async fn fetch_games(&self) -> Result<Vec<GameRecord>, FetchError> {
        debug!("Fetching slate from {}", self.url);

        let resp = self.http.get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp.bytes().await?;
        let games = parse_body(&body)?;
        info!("Fetched {} games from {}", games.len(), self.url);
        Ok(games)
    }
}
