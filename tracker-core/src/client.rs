use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::ClientError,
    model::{LocationCandidate, WeatherSnapshot},
};

/// Production endpoint base; tests point [`WeatherApiClient`] elsewhere.
pub const WEATHER_API_BASE: &str = "https://api.weatherapi.com/v1";

/// Capability seam over the remote weather provider.
///
/// One production implementation ([`WeatherApiClient`]) and whatever
/// scripted doubles the tests need. Implementations perform no retries and
/// have no side effects beyond the network call itself; every failure is
/// surfaced as a [`ClientError`].
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Fetch current conditions for a free-text or `"lat,lon"` query.
    async fn fetch_current_weather(&self, query: &str) -> Result<WeatherSnapshot, ClientError>;

    /// Resolve a partial location name into candidates, in provider
    /// relevance order. An empty list is a successful result.
    async fn search_locations(&self, query: &str) -> Result<Vec<LocationCandidate>, ClientError>;
}

/// WeatherAPI.com client over the two read-only GET endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, WEATHER_API_BASE.to_string())
    }

    /// Client against a non-default base URL (mock servers in tests,
    /// regional mirrors).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn validate(query: &str) -> Result<&str, ClientError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ClientError::Validation("query must not be empty".to_string()));
        }
        Ok(trimmed)
    }

    /// GET `<base>/<endpoint>` with the key and percent-encoded query
    /// parameters, returning the raw body of a 2xx response.
    async fn get_body(&self, endpoint: &str, query: &str) -> Result<String, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status { status, body: truncate_body(&body) });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherService for WeatherApiClient {
    async fn fetch_current_weather(&self, query: &str) -> Result<WeatherSnapshot, ClientError> {
        let query = Self::validate(query)?;
        tracing::debug!(query, "fetching current weather");

        let body = self.get_body("current.json", query).await?;
        let parsed: WaCurrentResponse = serde_json::from_str(&body)?;

        Ok(WeatherSnapshot {
            location_name: parsed.location.name,
            region: parsed.location.region,
            country: parsed.location.country,
            temperature_f: parsed.current.temp_f,
            feels_like_f: parsed.current.feelslike_f,
            humidity_pct: parsed.current.humidity,
            uv_index: parsed.current.uv,
            condition_text: parsed.current.condition.text,
            condition_icon_ref: parsed.current.condition.icon,
            condition_code: parsed.current.condition.code,
        })
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<LocationCandidate>, ClientError> {
        let query = Self::validate(query)?;
        tracing::debug!(query, "searching locations");

        let body = self.get_body("search.json", query).await?;
        let candidates: Vec<LocationCandidate> = serde_json::from_str(&body)?;

        tracing::debug!(count = candidates.len(), "search returned candidates");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_f: f64,
    feelslike_f: f64,
    humidity: u8,
    uv: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
    code: i64,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (1..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
