//! Screen state and the pure transition function driving it.

use crate::model::{CityReport, ForecastEntry, WeatherSnapshot};

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR: &str = "An unexpected error occurred";

/// Everything the screen renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query_text: String,
    /// True while `in_flight` is above zero.
    pub is_loading: bool,
    /// Operations started and not yet finished.
    pub in_flight: usize,
    /// Empty when there is no error.
    pub last_error: String,
    pub current_weather: Option<WeatherSnapshot>,
    pub forecast: Vec<ForecastEntry>,
    pub favorites: Vec<String>,
}

impl ViewState {
    pub fn has_error(&self) -> bool {
        !self.last_error.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    QueryEdited(String),
    LoadingStarted,
    LoadingFinished,
    CityLoaded(CityReport),
    CityNotFound,
    /// Current conditions at the device position.
    LocationResolved(WeatherSnapshot),
    Failed(String),
    FavoritesLoaded(Vec<String>),
}

/// Produce the state that follows `event`.
pub fn reduce(state: &ViewState, event: Event) -> ViewState {
    let mut next = state.clone();

    match event {
        Event::QueryEdited(text) => next.query_text = text,
        Event::LoadingStarted => {
            next.in_flight += 1;
            next.is_loading = true;
        }
        Event::LoadingFinished => {
            next.in_flight = next.in_flight.saturating_sub(1);
            next.is_loading = next.in_flight > 0;
        }
        Event::CityLoaded(report) => {
            next.current_weather = Some(report.current);
            next.forecast = report.forecast;
            next.last_error.clear();
        }
        Event::CityNotFound => {
            next.current_weather = None;
            next.forecast.clear();
        }
        Event::LocationResolved(snapshot) => {
            next.query_text = snapshot.city_name.clone();
            next.current_weather = Some(snapshot);
        }
        Event::Failed(message) => {
            next.last_error = if message.trim().is_empty() {
                GENERIC_ERROR.to_string()
            } else {
                message
            };
        }
        Event::FavoritesLoaded(list) => next.favorites = list,
    }

    next
}
