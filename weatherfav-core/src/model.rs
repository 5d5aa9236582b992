use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base of the provider-owned icon images; `{icon}.png` is appended.
pub const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// The forecast endpoint samples every 3 hours, so every 8th reading is one per day.
pub const FORECAST_STRIDE: usize = 8;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Display name resolved by the provider, may differ from the query.
    pub city_name: String,
    pub temperature_celsius: f64,
    pub condition_description: String,
    pub icon_id: String,
}

impl WeatherSnapshot {
    pub fn icon_url(&self) -> String {
        icon_url(&self.icon_id)
    }
}

/// One sampled future reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub condition_description: String,
    pub icon_id: String,
}

impl ForecastEntry {
    pub fn icon_url(&self) -> String {
        icon_url(&self.icon_id)
    }
}

/// Current conditions plus the daily forecast for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityReport {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
}

/// Outcome of a lookup by city name.
#[derive(Debug, Clone, PartialEq)]
pub enum CityLookup {
    /// The query was blank; nothing was requested.
    Skipped,
    /// The provider answered with a non-OK status code.
    NotFound,
    Found(CityReport),
}

pub fn icon_url(icon_id: &str) -> String {
    format!("{ICON_URL_BASE}/{icon_id}.png")
}

/// Keep indices 0, 8, 16, ... of a chronological series.
pub fn daily_samples<T>(series: Vec<T>) -> Vec<T> {
    series.into_iter().step_by(FORECAST_STRIDE).collect()
}
