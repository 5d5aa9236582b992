//! Core library for the `weatherfav` client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its OpenWeather implementation
//! - Favorites persistence over a small key-value store
//! - Device location lookup behind a permission check
//! - Screen state and the controller that drives it
//!
//! It is used by `weatherfav-cli`, but holds no terminal or rendering code.

pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod location;
pub mod model;
pub mod provider;
pub mod state;
pub mod storage;

pub use config::Config;
pub use controller::WeatherApp;
pub use error::{LocationError, WeatherError};
pub use favorites::FavoritesStore;
pub use location::{LocationProvider, LocationResolver, PermissionStatus};
pub use model::{CityLookup, CityReport, Coordinates, ForecastEntry, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use state::{Event, ViewState, reduce};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
