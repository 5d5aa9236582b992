use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::WeatherError,
    model::{CityLookup, CityReport, Coordinates, ForecastEntry, WeatherSnapshot, daily_samples},
};

use super::WeatherProvider;

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// GET `path` and decode the body, whatever the HTTP status; the
    /// provider reports its own status in the payload.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Requesting OpenWeather {what}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!("OpenWeather {what} answered with HTTP {status}");

        serde_json::from_str(&body).map_err(|e| WeatherError::Parse {
            what,
            detail: format!("{e} (body: {})", truncate_body(&body)),
        })
    }
}

/// `cod` arrives as a number on some endpoints and as a string on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn is_ok(&self) -> bool {
        match self {
            OwCode::Number(n) => *n == 200,
            OwCode::Text(s) => s.trim() == "200",
        }
    }

    fn into_error(self, message: Option<Value>) -> WeatherError {
        let code = match self {
            OwCode::Number(n) => n.to_string(),
            OwCode::Text(s) => s,
        };
        let message = match message {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => "no details".to_string(),
        };
        WeatherError::Status { code, message }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: OwCode,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    name: String,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let main = self.main.ok_or_else(|| WeatherError::Parse {
            what: "current weather",
            detail: "missing `main` block".to_string(),
        })?;
        let (condition_description, icon_id) = first_condition(self.weather);

        Ok(WeatherSnapshot {
            city_name: self.name,
            temperature_celsius: main.temp,
            condition_description,
            icon_id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwReading {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

impl OwReading {
    fn into_entry(self) -> ForecastEntry {
        let (condition_description, icon_id) = first_condition(self.weather);

        ForecastEntry {
            timestamp: DateTime::<Utc>::from_timestamp(self.dt, 0).unwrap_or_else(Utc::now),
            temperature_celsius: self.main.temp,
            condition_description,
            icon_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    cod: OwCode,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    list: Vec<OwReading>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_by_city(&self, name: &str) -> Result<CityLookup, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Blank city name, skipping lookup");
            return Ok(CityLookup::Skipped);
        }

        let query = [("q", name.to_string())];
        let (current, forecast) = tokio::try_join!(
            self.get_json::<OwCurrentResponse>(CURRENT_PATH, "current weather", &query),
            self.get_json::<OwForecastResponse>(FORECAST_PATH, "forecast", &query),
        )?;

        if !current.cod.is_ok() {
            tracing::info!("No weather for {name:?} (status {:?})", current.cod);
            return Ok(CityLookup::NotFound);
        }
        if !forecast.cod.is_ok() {
            return Err(forecast.cod.into_error(forecast.message));
        }

        let current = current.into_snapshot()?;
        let forecast = daily_samples(forecast.list).into_iter().map(OwReading::into_entry).collect();

        Ok(CityLookup::Found(CityReport { current, forecast }))
    }

    async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let query = [
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
        ];
        let current: OwCurrentResponse =
            self.get_json(CURRENT_PATH, "current weather", &query).await?;

        if !current.cod.is_ok() {
            return Err(current.cod.into_error(current.message));
        }

        current.into_snapshot()
    }
}

fn first_condition(conditions: Vec<OwCondition>) -> (String, String) {
    conditions
        .into_iter()
        .next()
        .map(|c| (c.description, c.icon))
        .unwrap_or_else(|| ("unknown".to_string(), String::new()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body(name: &str, temp: f64, icon: &str) -> Value {
        json!({
            "cod": 200,
            "name": name,
            "main": { "temp": temp, "humidity": 50 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": icon }],
        })
    }

    fn forecast_body(len: usize) -> Value {
        let list: Vec<Value> = (0..len)
            .map(|i| {
                json!({
                    "dt": 1_700_000_000 + (i as i64) * 3 * 3600,
                    "main": { "temp": i as f64 },
                    "weather": [{ "description": format!("reading {i}"), "icon": "02d" }],
                })
            })
            .collect();
        json!({ "cod": "200", "message": 0, "cnt": len, "list": list })
    }

    async fn mount(server: &MockServer, endpoint: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::with_base_url("TEST_KEY".into(), server.uri())
    }

    #[tokio::test]
    async fn city_lookup_returns_current_and_daily_forecast() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris", 15.0, "01d")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
            .mount(&server)
            .await;

        let lookup = provider(&server).fetch_by_city("Paris").await.unwrap();
        let report = match lookup {
            CityLookup::Found(report) => report,
            other => panic!("expected a report, got {other:?}"),
        };

        assert_eq!(
            report.current,
            WeatherSnapshot {
                city_name: "Paris".into(),
                temperature_celsius: 15.0,
                condition_description: "clear sky".into(),
                icon_id: "01d".into(),
            }
        );
        assert_eq!(report.forecast.len(), 5);
        let temps: Vec<f64> = report.forecast.iter().map(|e| e.temperature_celsius).collect();
        assert_eq!(temps, vec![0.0, 8.0, 16.0, 24.0, 32.0]);
        assert_eq!(report.forecast[1].condition_description, "reading 8");
        assert_eq!(report.forecast[1].timestamp.timestamp(), 1_700_000_000 + 8 * 3 * 3600);
    }

    #[tokio::test]
    async fn provider_name_may_differ_from_query() {
        let server = MockServer::start().await;
        mount(&server, CURRENT_PATH, 200, current_body("Paris", 11.5, "04n")).await;
        mount(&server, FORECAST_PATH, 200, forecast_body(17)).await;

        let lookup = provider(&server).fetch_by_city("  paris fr ").await.unwrap();
        let report = match lookup {
            CityLookup::Found(report) => report,
            other => panic!("expected a report, got {other:?}"),
        };

        assert_eq!(report.current.city_name, "Paris");
        assert_eq!(report.forecast.len(), 3);

        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| r.url.query().unwrap_or("").contains("q=paris+fr")));
    }

    #[tokio::test]
    async fn unknown_city_is_not_found_rather_than_error() {
        let server = MockServer::start().await;
        let body = json!({ "cod": "404", "message": "city not found" });
        mount(&server, CURRENT_PATH, 404, body.clone()).await;
        mount(&server, FORECAST_PATH, 404, body).await;

        let lookup = provider(&server).fetch_by_city("Zzzznotacity").await.unwrap();
        assert_eq!(lookup, CityLookup::NotFound);
    }

    #[tokio::test]
    async fn blank_city_makes_no_requests() {
        let server = MockServer::start().await;

        let lookup = provider(&server).fetch_by_city("   ").await.unwrap();

        assert_eq!(lookup, CityLookup::Skipped);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn forecast_failure_after_current_success_is_an_error() {
        let server = MockServer::start().await;
        mount(&server, CURRENT_PATH, 200, current_body("Paris", 15.0, "01d")).await;
        mount(&server, FORECAST_PATH, 429, json!({ "cod": 429, "message": "rate limited" })).await;

        let err = provider(&server).fetch_by_city("Paris").await.unwrap_err();
        assert_eq!(err.to_string(), "Weather provider returned status 429: rate limited");
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = provider(&server).fetch_by_city("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse { .. }));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let provider =
            OpenWeatherProvider::with_base_url("TEST_KEY".into(), "http://127.0.0.1:1".into());

        let err = provider.fetch_by_city("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::Request(_)));
        assert!(err.to_string().starts_with("Network error"));
    }

    #[tokio::test]
    async fn coordinate_lookup_resolves_city_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .and(query_param("lat", "48.8566"))
            .and(query_param("lon", "2.3522"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris", 14.2, "03d")))
            .mount(&server)
            .await;

        let snapshot = provider(&server)
            .fetch_by_coordinates(Coordinates::new(48.8566, 2.3522))
            .await
            .unwrap();

        assert_eq!(snapshot.city_name, "Paris");
        assert_eq!(snapshot.temperature_celsius, 14.2);
    }

    #[tokio::test]
    async fn coordinate_lookup_surfaces_provider_status() {
        let server = MockServer::start().await;
        mount(&server, CURRENT_PATH, 401, json!({ "cod": 401, "message": "Invalid API key" })).await;

        let err = provider(&server)
            .fetch_by_coordinates(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Weather provider returned status 401: Invalid API key");
    }

    #[test]
    fn missing_conditions_fall_back_to_unknown() {
        assert_eq!(first_condition(Vec::new()), ("unknown".to_string(), String::new()));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).len(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
