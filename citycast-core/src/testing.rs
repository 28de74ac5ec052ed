//! In-memory fakes shared by the unit tests.

use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::Notify;

use crate::{
    app::{Outcome, Presenter},
    model::Coordinate,
    provider::{
        Condition, GeoCandidate, RawCurrent, RawForecastEntry, SourceError, WeatherSource,
    },
};

/// 2024-05-01T00:00:00Z
const FORECAST_START: i64 = 1_714_521_600;

#[derive(Debug, Default)]
pub struct FakeSource {
    candidates: Vec<GeoCandidate>,
    current: Option<RawCurrent>,
    forecast: Option<Vec<RawForecastEntry>>,
    fail_geocode: bool,
    fail_current: bool,
    fail_forecast: bool,
    gate: Option<(String, Arc<Notify>)>,

    geocode_calls: AtomicUsize,
    current_calls: AtomicUsize,
    forecast_calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
    last_coordinate: Mutex<Option<Coordinate>>,
}

impl FakeSource {
    pub fn sample_current() -> RawCurrent {
        RawCurrent {
            name: "London".into(),
            country: Some("GB".into()),
            sunrise: FORECAST_START + 5 * 3600,
            sunset: FORECAST_START + 20 * 3600,
            temp: 11.6,
            feels_like: 10.2,
            humidity: 81,
            pressure: 1012.0,
            conditions: vec![
                Condition {
                    description: "light rain".into(),
                    icon: "10d".into(),
                },
                Condition {
                    description: "mist".into(),
                    icon: "50d".into(),
                },
            ],
            visibility: Some(8000.0),
            wind_speed: 10.0,
        }
    }

    /// Five days of 3-hourly entries starting at midnight UTC.
    pub fn sample_forecast() -> Vec<RawForecastEntry> {
        (0..40)
            .map(|i| RawForecastEntry {
                dt: FORECAST_START + i * 3 * 3600,
                temp: 8.0 + (i % 8) as f64,
                conditions: vec![Condition {
                    description: "scattered clouds".into(),
                    icon: "03d".into(),
                }],
            })
            .collect()
    }

    pub fn with_candidates(mut self, candidates: Vec<(&str, Coordinate)>) -> Self {
        self.candidates = candidates
            .into_iter()
            .map(|(name, coordinate)| GeoCandidate {
                name: name.to_string(),
                coordinate,
                country: None,
                state: None,
            })
            .collect();
        self
    }

    pub fn with_current(mut self, current: RawCurrent) -> Self {
        self.current = Some(current);
        self
    }

    pub fn with_forecast(mut self, forecast: Vec<RawForecastEntry>) -> Self {
        self.forecast = Some(forecast);
        self
    }

    pub fn failing_geocode(mut self) -> Self {
        self.fail_geocode = true;
        self
    }

    pub fn failing_current(mut self) -> Self {
        self.fail_current = true;
        self
    }

    pub fn failing_forecast(mut self) -> Self {
        self.fail_forecast = true;
        self
    }

    /// Hold geocoding of `city` until `gate` is notified.
    pub fn gate_city(mut self, city: &str, gate: Arc<Notify>) -> Self {
        self.gate = Some((city.to_string(), gate));
        self
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.geocode_calls() + self.current_calls() + self.forecast_calls()
    }

    pub fn last_geocode_query(&self) -> Option<String> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }

    pub fn last_coordinate(&self) -> Option<Coordinate> {
        self.last_coordinate.lock().ok().and_then(|c| *c)
    }

    fn unavailable() -> SourceError {
        SourceError::Status {
            status: 503,
            body: "service unavailable".into(),
        }
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn geocode(&self, city: &str) -> Result<Vec<GeoCandidate>, SourceError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(city.to_string());
        }

        if let Some((gated, gate)) = &self.gate {
            if gated == city {
                gate.notified().await;
            }
        }

        if self.fail_geocode {
            return Err(SourceError::Request("connection refused".into()));
        }
        Ok(self.candidates.clone())
    }

    async fn current(&self, coord: Coordinate) -> Result<RawCurrent, SourceError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_coordinate.lock() {
            *last = Some(coord);
        }

        if self.fail_current {
            return Err(Self::unavailable());
        }
        Ok(self.current.clone().unwrap_or_else(Self::sample_current))
    }

    async fn forecast(&self, _coord: Coordinate) -> Result<Vec<RawForecastEntry>, SourceError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_forecast {
            return Err(Self::unavailable());
        }
        Ok(self.forecast.clone().unwrap_or_else(Self::sample_forecast))
    }
}

/// Presenter that remembers everything it was shown.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    outcomes: Mutex<Vec<Outcome>>,
}

impl RecordingPresenter {
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, outcome: &Outcome) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push(outcome.clone());
        }
    }
}
