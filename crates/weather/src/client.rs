use std::time::Duration;

use tracing::{debug, warn};

use crate::contract::{WeatherRequest, WeatherResponse};

#[derive(Debug)]
pub enum WeatherError {
    /// Transport failure or an undecodable body.
    Http(reqwest::Error),
    /// Non-2xx status from the endpoint.
    Status(u16),
    /// The endpoint answered with `{ "error": ... }`.
    Backend(String),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Http(e) => write!(f, "weather request failed: {e}"),
            WeatherError::Status(code) => write!(f, "weather endpoint returned HTTP {code}"),
            WeatherError::Backend(msg) => write!(f, "weather backend error: {msg}"),
        }
    }
}

impl std::error::Error for WeatherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeatherError::Http(e) => Some(e),
            _ => None,
        }
    }
}

/// Thin async client for `POST {base_url}/api/weather`.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherError::Http)?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/weather", self.base_url)
    }

    pub async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherResponse, WeatherError> {
        let url = self.endpoint();
        debug!(
            %url,
            date = %request.target_date_str,
            hour = request.target_hour,
            lat = request.lat,
            lon = request.lon,
            "requesting weather"
        );

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(WeatherError::Http)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "weather endpoint rejected request");
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body: WeatherResponse = resp.json().await.map_err(WeatherError::Http)?;
        if let Some(msg) = body.error {
            warn!(error = %msg, "weather backend reported an error");
            return Err(WeatherError::Backend(msg));
        }
        Ok(body)
    }
}
