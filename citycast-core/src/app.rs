//! Request orchestration: resolve, fetch, hand the result to a presenter.
//!
//! Each request takes a [`Ticket`] when it starts. When it finishes, the outcome
//! is only presented if no newer request has started in the meantime, so a slow
//! stale response can never overwrite a newer one.

use chrono::{Local, TimeZone};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tracing::{debug, info};

use crate::{
    config::Config,
    country::{BuiltinCountries, CountryNames},
    error::AppError,
    fetcher::WeatherFetcher,
    location::DeviceLocation,
    model::{LocationQuery, WeatherReport},
    provider::{OpenWeatherClient, WeatherSource},
    resolver::Resolver,
};

/// Result of one request, as handed to the presenter.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(WeatherReport),
    Failure(AppError),
}

impl From<Result<WeatherReport, AppError>> for Outcome {
    fn from(result: Result<WeatherReport, AppError>) -> Self {
        match result {
            Ok(report) => Outcome::Success(report),
            Err(err) => Outcome::Failure(err),
        }
    }
}

/// Renders finished outcomes. Called at most once per request.
pub trait Presenter: Send + Sync {
    fn present(&self, outcome: &Outcome);
}

/// Whether a finished request reached the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Presented,
    /// A newer request started first; this outcome was dropped.
    Discarded,
}

/// Identifies one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic request counter. Only the latest ticket is current.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: Mutex<u64>,
}

impl RequestGeneration {
    fn counter(&self) -> MutexGuard<'_, u64> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin(&self) -> Ticket {
        let mut latest = self.counter();
        *latest += 1;
        Ticket(*latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        *self.counter() == ticket.0
    }

    /// Run `f` only if `ticket` is still the latest.
    ///
    /// The counter stays locked while `f` runs, so no newer request can begin
    /// or deliver until it returns.
    pub fn if_current<R>(&self, ticket: Ticket, f: impl FnOnce() -> R) -> Option<R> {
        let latest = self.counter();
        if *latest != ticket.0 {
            return None;
        }
        let out = f();
        drop(latest);
        Some(out)
    }
}

/// The whole lookup pipeline wired to a presenter.
///
/// Forecast days are grouped in `Tz`, the local zone by default.
pub struct WeatherApp<P, Tz: TimeZone = Local> {
    resolver: Resolver,
    fetcher: WeatherFetcher,
    location: Arc<dyn DeviceLocation>,
    presenter: P,
    generation: RequestGeneration,
    tz: Tz,
}

impl<P: Presenter> WeatherApp<P, Local> {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        countries: Arc<dyn CountryNames>,
        location: Arc<dyn DeviceLocation>,
        presenter: P,
    ) -> Self {
        Self {
            resolver: Resolver::new(source.clone()),
            fetcher: WeatherFetcher::new(source, countries),
            location,
            presenter,
            generation: RequestGeneration::default(),
            tz: Local,
        }
    }

    /// Build an app backed by OpenWeather using the stored configuration.
    pub fn from_config(
        config: &Config,
        location: Arc<dyn DeviceLocation>,
        presenter: P,
    ) -> Result<Self, AppError> {
        let api_key = config
            .require_api_key()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let client = OpenWeatherClient::new(
            api_key,
            config.endpoints.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map_err(|e| AppError::Config(format!("Failed to initialise HTTP client: {e}")))?;

        Ok(Self::new(
            Arc::new(client),
            Arc::new(BuiltinCountries),
            location,
            presenter,
        ))
    }
}

impl<P: Presenter, Tz: TimeZone> WeatherApp<P, Tz> {
    /// Group forecast days in `tz` instead.
    pub fn with_timezone<Tz2: TimeZone>(self, tz: Tz2) -> WeatherApp<P, Tz2> {
        WeatherApp {
            resolver: self.resolver,
            fetcher: self.fetcher,
            location: self.location,
            presenter: self.presenter,
            generation: self.generation,
            tz,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Look up the weather for a typed-in city name.
    pub async fn search(&self, input: &str) -> Delivery {
        self.lookup(LocationQuery::City(input.to_string())).await
    }

    /// Look up the weather at the device's current position.
    pub async fn locate(&self) -> Delivery {
        let ticket = self.generation.begin();

        let result = match self.location.current_position().await {
            Ok(coord) => {
                info!(coordinate = %coord, "Device position acquired");
                self.resolve_and_fetch(&LocationQuery::Coordinate(coord)).await
            }
            Err(kind) => Err(AppError::from(kind)),
        };

        self.deliver(ticket, result)
    }

    pub async fn lookup(&self, query: LocationQuery) -> Delivery {
        let ticket = self.generation.begin();
        let result = self.resolve_and_fetch(&query).await;
        self.deliver(ticket, result)
    }

    async fn resolve_and_fetch(&self, query: &LocationQuery) -> Result<WeatherReport, AppError> {
        let coord = self.resolver.resolve(query).await?;
        self.fetcher.fetch(coord, &self.tz).await
    }

    fn deliver(&self, ticket: Ticket, result: Result<WeatherReport, AppError>) -> Delivery {
        let outcome = Outcome::from(result);
        let presented = self
            .generation
            .if_current(ticket, || self.presenter.present(&outcome));

        match presented {
            Some(()) => {
                if let Outcome::Failure(err) = &outcome {
                    info!(error = %err, "Request failed");
                }
                Delivery::Presented
            }
            None => {
                debug!(?ticket, "Dropping outcome of superseded request");
                Delivery::Discarded
            }
        }
    }
}
