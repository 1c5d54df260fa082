use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::ApiEnvelope;

/// Vehicle type parameter of the feed: 1 = buses, 2 = trams.
const VEHICLE_TYPE_BUS: &str = "1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Anything that can produce the current full vehicle set. The sync
/// controller only depends on this, so tests can swap in a scripted source.
#[async_trait]
pub trait VehicleSource: Send + Sync {
    /// Fetch the complete, unfiltered bus position set.
    async fn fetch_all(&self) -> Result<ApiEnvelope, ApiError>;
}

/// Client for the Warsaw open-data `busestrams_get` endpoint.
///
/// Always requests the full bus set; line and viewport filtering happen
/// client-side. `line`/`brigade` exist on the endpoint but the sync core
/// never populates them.
pub struct WarsawClient {
    client: reqwest::Client,
    base_url: String,
    resource_id: String,
    api_key: String,
}

impl WarsawClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            resource_id: config.resource_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_buses(
        &self,
        line: Option<&str>,
        brigade: Option<&str>,
    ) -> Result<ApiEnvelope, ApiError> {
        let url = format!("{}/api/action/busestrams_get/", self.base_url);

        let mut query: Vec<(&str, &str)> = vec![
            ("resource_id", self.resource_id.as_str()),
            ("apikey", self.api_key.as_str()),
            ("type", VEHICLE_TYPE_BUS),
        ];
        if let Some(line) = line {
            query.push(("line", line));
        }
        if let Some(brigade) = brigade {
            query.push(("brigade", brigade));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api(format!("HTTP error: {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        parse_envelope(&body).inspect_err(|e| {
            // Log a prefix only; error bodies can be full HTML pages.
            let preview: String = body.chars().take(500).collect();
            tracing::warn!(
                error = %e,
                body = %preview,
                "Failed to parse bus feed response"
            );
        })
    }
}

#[async_trait]
impl VehicleSource for WarsawClient {
    async fn fetch_all(&self) -> Result<ApiEnvelope, ApiError> {
        self.get_buses(None, None).await
    }
}

/// Decode a feed body. The endpoint reports its own errors by replacing the
/// `result` array with a message string, which fails deserialization and is
/// treated as a malformed body.
fn parse_envelope(body: &str) -> Result<ApiEnvelope, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}
