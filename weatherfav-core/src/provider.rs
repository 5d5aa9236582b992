use crate::{
    Config,
    error::WeatherError,
    model::{CityLookup, Coordinates, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Read-only access to a remote weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions and the daily forecast for a city name.
    ///
    /// A name that is blank after trimming yields [`CityLookup::Skipped`]
    /// without touching the network.
    async fn fetch_by_city(&self, name: &str) -> Result<CityLookup, WeatherError>;

    /// Current conditions at a position; mostly used to learn its city name.
    async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, WeatherError>;
}

/// Construct the weather provider from config. Fails if no API key is set.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    Ok(Arc::new(OpenWeatherProvider::with_base_url(
        api_key.to_owned(),
        config.base_url().to_owned(),
    )))
}
