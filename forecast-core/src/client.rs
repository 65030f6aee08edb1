use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    error::{ForecastError, Result},
    mapper::{ForecastHeaders, HeaderPolicy, map_response},
    model::{ForecastResponse, Location},
    request::{DEFAULT_BASE_URL, ForecastRequest, build_url},
    transport::{HttpTransport, Transport},
};

/// Settings captured when a [`ForecastClient`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub header_policy: HeaderPolicy,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            header_policy: HeaderPolicy::default(),
        }
    }
}

/// Straight-through client: build URL, GET it once, map the response.
///
/// The configuration is fixed for the lifetime of the value; use
/// [`ForecastClient::with_api_key`] to get a client for another key.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ForecastClient {
    /// Client for `api_key` over the default HTTP transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Returns a client for another key, sharing this one's transport.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                api_key: api_key.into(),
                ..self.config.clone()
            },
            transport: Arc::clone(&self.transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current conditions and forecast at a location.
    pub async fn fetch_now(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse> {
        let location = Location::new(latitude, longitude)?;
        self.fetch(&ForecastRequest::new(location)).await
    }

    /// Conditions at a location for a past or future instant.
    pub async fn fetch_at(
        &self,
        latitude: f64,
        longitude: f64,
        time: DateTime<Utc>,
    ) -> Result<ForecastResponse> {
        let location = Location::new(latitude, longitude)?;
        self.fetch(&ForecastRequest::new(location).at(time)).await
    }

    pub async fn fetch(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        if self.config.api_key.trim().is_empty() {
            return Err(ForecastError::MissingApiKey);
        }

        let url = build_url(&self.config.base_url, &self.config.api_key, request);

        tracing::debug!(
            latitude = request.location.latitude(),
            longitude = request.location.longitude(),
            time = ?request.time,
            units = ?request.units,
            extend = ?request.extend,
            exclude = ?request.exclude,
            "requesting forecast"
        );

        let raw = self.transport.get(&url).await?;
        let headers = ForecastHeaders::from_header_map(&raw.headers);

        map_response(&raw.body, &headers, self.config.header_policy)
    }
}
