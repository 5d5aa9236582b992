use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Password, Select, Text};
use std::{fmt, sync::Arc};
use weatherfav_core::{
    Config, Coordinates, FavoritesStore, FileStore, LocationResolver, WeatherApp,
    provider_from_config,
};

use crate::{location::PromptLocation, view};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherfav", version, about = "Current weather, a daily forecast and favorite cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and an optional home position.
    Configure,

    /// Show weather for a city.
    Search {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,

        /// Add the resolved city to favorites.
        #[arg(long)]
        save: bool,
    },

    /// Show weather at the current position.
    Here {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Grant location permission without asking.
        #[arg(long, short)]
        yes: bool,

        /// Add the resolved city to favorites.
        #[arg(long)]
        save: bool,
    },

    /// List favorite cities.
    Favorites,

    /// Show weather for a saved favorite.
    Favorite {
        name: String,
    },

    /// Menu-driven session.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Favorites => {
                let config = Config::from_env()?;
                let favorites = favorites_store(&config)?.load();
                if favorites.is_empty() {
                    println!("No favorites yet. Use `weatherfav search <city> --save`.");
                }
                for name in favorites {
                    println!("{name}");
                }
            }
            Command::Search { city, save } => {
                let app = build_app(&Config::from_env()?, None, false)?;
                app.load_favorites();
                app.set_query(city);
                app.submit_query().await;
                if save {
                    app.add_current_to_favorites();
                }
                print!("{}", view::render(&app.state()));
            }
            Command::Here { lat, lon, yes, save } => {
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                let app = build_app(&Config::from_env()?, position, yes)?;
                app.load_favorites();
                app.use_my_location().await;
                if save {
                    app.add_current_to_favorites();
                }
                print!("{}", view::render(&app.state()));
            }
            Command::Favorite { name } => {
                let app = build_app(&Config::from_env()?, None, false)?;
                app.load_favorites();
                if !app.state().favorites.contains(&name) {
                    bail!("'{name}' is not a favorite. Run `weatherfav favorites` to list them.");
                }
                app.select_favorite(&name).await;
                print!("{}", view::render(&app.state()));
            }
            Command::Interactive => {
                let app = build_app(&Config::from_env()?, None, false)?;
                app.load_favorites();
                interactive(&app).await?;
            }
        }

        Ok(())
    }
}

fn favorites_store(config: &Config) -> Result<FavoritesStore> {
    let path = config.storage_file_path()?;
    tracing::debug!("Using storage file {}", path.display());
    let storage = FileStore::new(path);
    Ok(FavoritesStore::new(Arc::new(storage)))
}

/// Wire the controller; fails fast when the API key is missing.
fn build_app(config: &Config, position: Option<Coordinates>, assume_yes: bool) -> Result<WeatherApp> {
    let weather = provider_from_config(config)?;
    let location = PromptLocation::new(position.or(config.home), assume_yes);

    Ok(WeatherApp::new(
        weather,
        LocationResolver::new(Arc::new(location)),
        favorites_store(config)?,
    ))
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:").without_confirmation().prompt()?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key);

    let set_home = Confirm::new("Set a home position for `weatherfav here`?")
        .with_default(config.home.is_none())
        .prompt()?;
    if set_home {
        let latitude = CustomType::<f64>::new("Latitude:").prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:").prompt()?;
        let home = Coordinates::new(latitude, longitude);
        if !home.is_valid() {
            bail!("Position {home} is out of range");
        }
        config.set_home(home);
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    UseMyLocation,
    AddFavorite,
    OpenFavorite,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search",
            Action::UseMyLocation => "Use my location",
            Action::AddFavorite => "Add to favorites",
            Action::OpenFavorite => "Open a favorite",
            Action::Quit => "Quit",
        })
    }
}

async fn interactive(app: &WeatherApp) -> Result<()> {
    loop {
        let state = app.state();
        println!("{}", view::render(&state));

        let mut actions = vec![Action::Search, Action::UseMyLocation];
        if state.current_weather.is_some() {
            actions.push(Action::AddFavorite);
        }
        if !state.favorites.is_empty() {
            actions.push(Action::OpenFavorite);
        }
        actions.push(Action::Quit);

        let action = match Select::new("What next?", actions).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match action {
            Action::Search => {
                let city = Text::new("City:").with_initial_value(&state.query_text).prompt()?;
                app.set_query(city);
                app.submit_query().await;
            }
            Action::UseMyLocation => app.use_my_location().await,
            Action::AddFavorite => app.add_current_to_favorites(),
            Action::OpenFavorite => {
                let name = Select::new("Favorite:", state.favorites.clone()).prompt()?;
                app.select_favorite(&name).await;
            }
            Action::Quit => break,
        }
    }

    Ok(())
}
