use serde::{Deserialize, Serialize};

/// A point on Earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What the user asked for: a place name to geocode, or a position they already have.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinate(Coordinate),
}

/// Snapshot of the weather right now at the resolved location.
///
/// Values keep full precision; rounding is left to whoever renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    /// Raw ISO 3166 alpha-2 code as reported upstream, if any.
    pub country_code: Option<String>,
    /// Display name looked up from `country_code`; the raw code when unknown.
    pub country_name: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub icon_id: String,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub visibility_km: Option<f64>,
    pub wind_speed_kmh: f64,
    /// Unix epoch seconds.
    pub sunrise: i64,
    /// Unix epoch seconds.
    pub sunset: i64,
}

/// One point of the 3-hourly forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix epoch seconds.
    pub timestamp: i64,
    pub temperature_c: f64,
    pub description: String,
    pub icon_id: String,
}

/// Everything a successful lookup produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    /// At most five samples, one per local calendar day.
    pub daily: Vec<ForecastSample>,
}
