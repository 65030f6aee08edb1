use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use std::fmt::Debug;

use crate::error::TransportError;

const USER_AGENT: &str = concat!("forecast-core/", env!("CARGO_PKG_VERSION"));

/// A successful HTTP exchange: status, headers and the raw body.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Performs a single GET. Implementations decide about TLS, timeouts and
/// proxies; the client never retries.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}

/// Default transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let res = self.http.get(url).send().await?;

        let status = res.status();
        let headers = res.headers().clone();
        let body = res.bytes().await?.to_vec();

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientConfig, ForecastClient, ForecastError};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FIXTURE: &str = include_str!("../fixtures/forecast.json");

    #[tokio::test]
    async fn get_captures_status_headers_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/KEY/1,2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Forecast-API-Calls", "17")
                    .set_body_string("{}"),
            )
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let raw = transport
            .get(&format!("{}/forecast/KEY/1,2", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(raw.status, 200);
        assert_eq!(raw.body, b"{}");
        assert_eq!(
            raw.headers
                .get("x-forecast-api-calls")
                .and_then(|v| v.to_str().ok()),
            Some("17")
        );
    }

    #[tokio::test]
    async fn client_maps_served_forecast() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast/KEY/53.430833,-2.960833"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Cache-Control", "max-age=3600")
                    .insert_header("X-Forecast-API-Calls", "5")
                    .insert_header("X-Response-Time", "100ms")
                    .set_body_string(FIXTURE),
            )
            .mount(&mock_server)
            .await;

        let config = ClientConfig {
            base_url: format!("{}/forecast", mock_server.uri()),
            ..ClientConfig::new("KEY")
        };
        let client = ForecastClient::from_config(config).unwrap();
        let response = client.fetch_now(53.430833, -2.960833).await.unwrap();

        assert_eq!(response.metadata.cache_control.as_deref(), Some("max-age=3600"));
        assert_eq!(response.metadata.api_calls, Some(5));
        assert_eq!(response.metadata.response_time_ms, Some(100));
        assert_eq!(
            response.currently.and_then(|c| c.summary).as_deref(),
            Some("Partly Cloudy")
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("x".repeat(500)))
            .mount(&mock_server)
            .await;

        let config = ClientConfig {
            base_url: format!("{}/forecast", mock_server.uri()),
            ..ClientConfig::new("KEY")
        };
        let client = ForecastClient::from_config(config).unwrap();
        let err = client.fetch_now(1.0, 2.0).await.unwrap_err();

        match err {
            ForecastError::Transport(TransportError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body.len(), 203);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("forbidden"), "forbidden");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
