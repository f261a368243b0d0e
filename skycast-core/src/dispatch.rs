use crate::{
    error::QueryError,
    model::{Coordinates, LocationQuery, WeatherReport},
    provider::WeatherProvider,
};

/// Turns a city name or coordinate pair into a [`WeatherReport`].
///
/// Current conditions are requested first; the forecast is only requested
/// once the provider has resolved the location. Nothing here renders or
/// persists anything.
#[derive(Debug)]
pub struct QueryDispatcher<P> {
    provider: P,
}

impl<P: WeatherProvider> QueryDispatcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fails with [`QueryError::EmptyInput`] without touching the network
    /// when `name` is blank.
    pub async fn fetch_by_city(&self, name: &str) -> Result<WeatherReport, QueryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QueryError::EmptyInput);
        }

        self.fetch(LocationQuery::City(name.to_string())).await
    }

    pub async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, QueryError> {
        self.fetch(LocationQuery::Coordinates(coordinates)).await
    }

    async fn fetch(&self, query: LocationQuery) -> Result<WeatherReport, QueryError> {
        let snapshot = self.provider.current(&query).await?;
        let forecast = self.provider.forecast(&query).await?;

        tracing::info!(
            location = %snapshot.location_name,
            country = %snapshot.country_code,
            points = forecast.len(),
            "weather loaded"
        );

        Ok(WeatherReport { snapshot, forecast })
    }
}
