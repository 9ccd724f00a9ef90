//! Low-level HTTP client: `WikiPricesHttp`.
//!
//! One method per API endpoint. Returns the raw body; parsing into domain
//! types happens in `domain::price_history::wire`. No retries: one call is
//! one request.

use crate::config::PriceHistoryConfig;
use crate::error::{HttpError, SdkError};
use crate::shared::{ItemId, Timestep};
use crate::source::PriceSource;

use async_trait::async_trait;
use reqwest::Client;

/// Low-level HTTP client for the OSRS Wiki prices API.
#[derive(Clone)]
pub struct WikiPricesHttp {
    base_url: String,
    timestep: Timestep,
    client: Client,
}

impl WikiPricesHttp {
    /// Build a client with the default configuration.
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        Self::from_config(&PriceHistoryConfig {
            base_url: base_url.to_string(),
            ..PriceHistoryConfig::default()
        })
    }

    pub fn from_config(config: &PriceHistoryConfig) -> Result<Self, SdkError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(HttpError::from)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timestep: config.timestep,
            client,
        })
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    pub(crate) fn timeseries_url(&self, item_id: ItemId) -> String {
        format!(
            "{}/timeseries?timestep={}&id={}",
            self.base_url,
            self.timestep.as_str(),
            item_id
        )
    }

    // ── Time series ──────────────────────────────────────────────────────

    pub async fn get_timeseries(&self, item_id: ItemId) -> Result<String, HttpError> {
        let url = self.timeseries_url(item_id);
        tracing::debug!(item_id = item_id.get(), "GET {}", url);
        self.get_text(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        let resp = self.client.get(url).send().await.map_err(classify)?;
        let status = resp.status();

        if status.is_success() {
            return resp.text().await.map_err(classify);
        }

        let body_text = resp.text().await.unwrap_or_default();
        Err(HttpError::Status {
            status: status.as_u16(),
            body: body_text,
        })
    }
}

#[async_trait]
impl PriceSource for WikiPricesHttp {
    async fn fetch_timeseries(&self, item_id: ItemId) -> Result<String, HttpError> {
        self.get_timeseries(item_id).await
    }
}

fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_connect() {
        HttpError::Connect(e.to_string())
    } else {
        HttpError::Reqwest(e)
    }
}
