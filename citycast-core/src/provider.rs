use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::Coordinate;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Failure of a single upstream call.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request could not be sent: {0}")]
    Request(String),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response could not be parsed: {0}")]
    Parse(String),
}

/// One forward-geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCandidate {
    pub name: String,
    pub coordinate: Coordinate,
    pub country: Option<String>,
    pub state: Option<String>,
}

/// Description text plus icon id for one weather condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

/// Current conditions as reported upstream, in upstream units.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCurrent {
    pub name: String,
    /// Absent for positions outside any country, e.g. open sea.
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub conditions: Vec<Condition>,
    /// Meters. Not every station reports it.
    pub visibility: Option<f64>,
    /// Meters per second.
    pub wind_speed: f64,
}

/// One entry of the upstream forecast list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastEntry {
    pub dt: i64,
    pub temp: f64,
    pub conditions: Vec<Condition>,
}

/// The three upstream calls a lookup needs.
///
/// All requests use metric units and English text.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Forward-geocode `city`, returning at most one candidate. An empty list means no match.
    async fn geocode(&self, city: &str) -> Result<Vec<GeoCandidate>, SourceError>;

    async fn current(&self, coord: Coordinate) -> Result<RawCurrent, SourceError>;

    async fn forecast(&self, coord: Coordinate) -> Result<Vec<RawForecastEntry>, SourceError>;
}
