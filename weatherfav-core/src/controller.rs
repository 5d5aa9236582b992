//! Orchestrates user actions against the weather, location and favorites
//! services and keeps the screen state current.
//!
//! Every action catches its own failures and records them in
//! [`ViewState::last_error`]; nothing propagates to the caller.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    favorites::FavoritesStore,
    location::LocationResolver,
    model::CityLookup,
    provider::WeatherProvider,
    state::{Event, ViewState, reduce},
};

#[derive(Debug)]
pub struct WeatherApp {
    state: Mutex<ViewState>,
    weather: Arc<dyn WeatherProvider>,
    location: LocationResolver,
    favorites: FavoritesStore,
}

impl WeatherApp {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        location: LocationResolver,
        favorites: FavoritesStore,
    ) -> Self {
        Self { state: Mutex::new(ViewState::default()), weather, location, favorites }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.state.lock().clone()
    }

    fn apply(&self, event: Event) {
        let mut state = self.state.lock();
        *state = reduce(&state, event);
    }

    /// Read persisted favorites into the state; done once at startup.
    pub fn load_favorites(&self) {
        self.apply(Event::FavoritesLoaded(self.favorites.load()));
    }

    pub fn set_query(&self, text: impl Into<String>) {
        self.apply(Event::QueryEdited(text.into()));
    }

    /// Look up whatever is in the query field.
    pub async fn submit_query(&self) {
        let query = self.state.lock().query_text.clone();
        self.search(&query).await;
    }

    /// Look up a city by name.
    ///
    /// A blank name raises the loading flag and returns without a lookup or
    /// a matching completion, so the flag stays raised.
    pub async fn search(&self, name: &str) {
        self.apply(Event::LoadingStarted);
        if name.trim().is_empty() {
            tracing::debug!("Ignoring blank search");
            return;
        }

        tracing::info!("Searching weather for {name:?}");
        self.lookup_city(name).await;
        self.apply(Event::LoadingFinished);
    }

    async fn lookup_city(&self, name: &str) {
        match self.weather.fetch_by_city(name).await {
            Ok(CityLookup::Found(report)) => self.apply(Event::CityLoaded(report)),
            Ok(CityLookup::NotFound) => self.apply(Event::CityNotFound),
            Ok(CityLookup::Skipped) => {}
            Err(e) => {
                tracing::warn!("Weather lookup for {name:?} failed: {e}");
                self.apply(Event::Failed(e.to_string()));
            }
        }
    }

    /// Resolve the device position to a city, then look that city up.
    pub async fn use_my_location(&self) {
        self.apply(Event::LoadingStarted);

        match self.location.current_coordinates().await {
            Ok(coordinates) => match self.weather.fetch_by_coordinates(coordinates).await {
                Ok(snapshot) => {
                    let city = snapshot.city_name.clone();
                    tracing::info!("Device position resolved to {city:?}");
                    self.apply(Event::LocationResolved(snapshot));
                    self.lookup_city(&city).await;
                }
                Err(e) => {
                    tracing::warn!("Weather lookup at {coordinates} failed: {e}");
                    self.apply(Event::Failed(e.to_string()));
                }
            },
            Err(e) => {
                tracing::warn!("Could not determine location: {e}");
                self.apply(Event::Failed(e.to_string()));
            }
        }

        self.apply(Event::LoadingFinished);
    }

    /// Save the displayed city. Does nothing when no weather is shown.
    pub fn add_current_to_favorites(&self) {
        let Some(city) = self.state.lock().current_weather.as_ref().map(|w| w.city_name.clone())
        else {
            tracing::debug!("No current weather to add to favorites");
            return;
        };

        let list = self.favorites.add(&city);
        self.apply(Event::FavoritesLoaded(list));
    }

    /// Look up a saved city, same as submitting its name.
    pub async fn select_favorite(&self, name: &str) {
        let known = self.state.lock().favorites.iter().any(|f| f == name);
        if !known {
            tracing::debug!("{name:?} is not a favorite");
            return;
        }

        self.search(name).await;
    }
}
