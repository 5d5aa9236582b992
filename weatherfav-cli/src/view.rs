use std::fmt::Write;

use weatherfav_core::ViewState;

/// Render the whole screen as plain text.
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_screen(&mut out, state);
    out
}

fn write_screen(out: &mut String, state: &ViewState) -> std::fmt::Result {
    writeln!(out, "Weather App")?;
    writeln!(out, "===========")?;

    if state.is_loading {
        writeln!(out, "Loading...")?;
    }

    if state.has_error() {
        writeln!(out, "Error: {}", state.last_error)?;
    }

    if let Some(weather) = &state.current_weather {
        writeln!(out)?;
        writeln!(out, "{}", weather.city_name)?;
        writeln!(out, "{:.1}°C", weather.temperature_celsius)?;
        writeln!(out, "{}", weather.condition_description)?;
        writeln!(out, "Icon: {}", weather.icon_url())?;
    }

    if !state.forecast.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}-Day Forecast", state.forecast.len())?;
        for entry in &state.forecast {
            writeln!(
                out,
                "  {}  {:>6.1}°C  {:<20}  {}",
                entry.timestamp.format("%a %d %b"),
                entry.temperature_celsius,
                entry.condition_description,
                entry.icon_url(),
            )?;
        }
    }

    if !state.favorites.is_empty() {
        writeln!(out)?;
        writeln!(out, "Favorites")?;
        for (i, favorite) in state.favorites.iter().enumerate() {
            writeln!(out, "  {}. {favorite}", i + 1)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use weatherfav_core::{ForecastEntry, WeatherSnapshot};

    fn paris() -> WeatherSnapshot {
        WeatherSnapshot {
            city_name: "Paris".into(),
            temperature_celsius: 15.0,
            condition_description: "clear sky".into(),
            icon_id: "01d".into(),
        }
    }

    #[test]
    fn empty_state_renders_title_only() {
        let out = render(&ViewState::default());
        assert_eq!(out, "Weather App\n===========\n");
    }

    #[test]
    fn loading_and_error_lines() {
        let state = ViewState {
            is_loading: true,
            last_error: "Permission to access location was denied".into(),
            ..ViewState::default()
        };

        let out = render(&state);
        assert!(out.contains("Loading..."));
        assert!(out.contains("Error: Permission to access location was denied"));
    }

    #[test]
    fn current_weather_block() {
        let state = ViewState { current_weather: Some(paris()), ..ViewState::default() };

        let out = render(&state);
        assert!(out.contains("\nParis\n15.0°C\nclear sky\n"));
        assert!(out.contains("Icon: https://openweathermap.org/img/wn/01d.png"));
        assert!(!out.contains("Forecast"));
    }

    #[test]
    fn forecast_lists_each_entry_with_its_own_date() {
        let forecast = (0..5)
            .map(|day| ForecastEntry {
                timestamp: Utc.with_ymd_and_hms(2026, 10, 18 + day, 12, 0, 0).unwrap(),
                temperature_celsius: 10.0 + day as f64,
                condition_description: "few clouds".into(),
                icon_id: "02d".into(),
            })
            .collect();
        let state = ViewState { forecast, ..ViewState::default() };

        let out = render(&state);
        assert!(out.contains("5-Day Forecast"));
        assert!(out.contains("Sun 18 Oct"));
        assert!(out.contains("Thu 22 Oct"));
        assert!(out.contains("14.0°C"));
    }

    #[test]
    fn favorites_are_numbered_in_order() {
        let state = ViewState {
            favorites: vec!["Oslo".into(), "Rome".into()],
            ..ViewState::default()
        };

        let out = render(&state);
        assert!(out.contains("Favorites\n  1. Oslo\n  2. Rome\n"));
    }
}
