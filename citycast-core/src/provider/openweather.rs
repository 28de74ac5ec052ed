use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::{config::Endpoints, model::Coordinate};

use super::{Condition, GeoCandidate, RawCurrent, RawForecastEntry, SourceError, WeatherSource};

const UNITS: &str = "metric";

/// HTTP client for the OpenWeather geocoding, current-weather and 5-day forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: String,
        endpoints: Endpoints,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        Ok(Self {
            api_key,
            endpoints,
            http,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `url` with `query` plus the API key and decode a JSON body.
    ///
    /// Query values are percent-encoded by reqwest.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        debug!(url, "OpenWeather request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    visibility: Option<f64>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Condition {
            description: w.description,
            icon: w.icon,
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn geocode(&self, city: &str) -> Result<Vec<GeoCandidate>, SourceError> {
        let url = format!("{}/direct", self.endpoints.geo_url);
        let entries: Vec<OwGeoEntry> = self
            .get_json(&url, &[("q", city), ("limit", "1")])
            .await?;

        Ok(entries
            .into_iter()
            .map(|e| GeoCandidate {
                name: e.name,
                coordinate: Coordinate::new(e.lat, e.lon),
                country: e.country,
                state: e.state,
            })
            .collect())
    }

    async fn current(&self, coord: Coordinate) -> Result<RawCurrent, SourceError> {
        let url = format!("{}/weather", self.endpoints.base_url);
        let (lat, lon) = (coord.latitude.to_string(), coord.longitude.to_string());
        let parsed: OwCurrentResponse = self
            .get_json(&url, &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", UNITS)])
            .await?;

        Ok(RawCurrent {
            name: parsed.name,
            country: parsed.sys.country,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            temp: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            conditions: parsed.weather.into_iter().map(Condition::from).collect(),
            visibility: parsed.visibility,
            wind_speed: parsed.wind.speed,
        })
    }

    async fn forecast(&self, coord: Coordinate) -> Result<Vec<RawForecastEntry>, SourceError> {
        let url = format!("{}/forecast", self.endpoints.base_url);
        let (lat, lon) = (coord.latitude.to_string(), coord.longitude.to_string());
        let parsed: OwForecastResponse = self
            .get_json(&url, &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", UNITS)])
            .await?;

        Ok(parsed
            .list
            .into_iter()
            .map(|e| RawForecastEntry {
                dt: e.dt,
                temp: e.main.temp,
                conditions: e.weather.into_iter().map(Condition::from).collect(),
            })
            .collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
