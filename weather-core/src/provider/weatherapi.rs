use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;

use crate::{config::DEFAULT_BASE_URL, model::WeatherReport};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_options(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for WeatherAPI.com")?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    /// GET `{base}/current.json` with `key` and `q`; the query builder
    /// percent-encodes both.
    pub fn current_request(&self, city: &str) -> RequestBuilder {
        self.http
            .get(format!("{}/current.json", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", city)])
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    code: Option<i64>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorBody,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_current(&self, city: &str) -> Result<WeatherReport> {
        let res = self
            .current_request(city)
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (current)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read WeatherAPI current response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "WeatherAPI current request failed with status {}: {}",
                status,
                describe_error_body(&body),
            ));
        }

        parse_current(&body)
    }
}

pub(crate) fn parse_current(body: &str) -> Result<WeatherReport> {
    let parsed: WaResponse =
        serde_json::from_str(body).context("Failed to parse WeatherAPI current JSON")?;

    Ok(WeatherReport {
        location_name: parsed.location.name,
        temperature_c: parsed.current.temp_c,
        humidity_pct: parsed.current.humidity,
        wind_kph: parsed.current.wind_kph,
        condition: parsed.current.condition.text,
        observation_time: parsed.current.last_updated_epoch.and_then(unix_to_utc),
    })
}

/// Prefer the provider's own error message; fall back to the raw body.
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<WaErrorResponse>(body) {
        Ok(WaErrorResponse { error: WaErrorBody { code: Some(code), message } }) => {
            format!("{message} (code {code})")
        }
        Ok(WaErrorResponse { error }) => error.message,
        Err(_) => truncate_body(body),
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
