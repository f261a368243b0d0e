use crate::{
    Config, QueryError,
    model::{ForecastPoint, LocationQuery, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and 3-hour forecasts. Values are metric.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, QueryError>;

    async fn forecast(&self, query: &LocationQuery) -> Result<Vec<ForecastPoint>, QueryError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::with_base_url(
        api_key.to_owned(),
        &config.base_url,
        config.timeout_secs,
    )?;

    Ok(provider)
}
