use crate::{Config, WeatherReport, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Source of current conditions for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> anyhow::Result<WeatherReport>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider =
        WeatherApiProvider::with_options(api_key.to_owned(), config.base_url(), config.timeout())?;

    Ok(Box::new(provider))
}
