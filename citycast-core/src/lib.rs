//! Core library for the `citycast` weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherSource`] seam
//! - City resolution, the joint current/forecast fetch and daily forecast reduction
//! - Error kinds with their user-facing messages
//! - The request pipeline that hands outcomes to a [`Presenter`]
//!
//! It is used by `citycast-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod country;
pub mod error;
pub mod fetcher;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{Delivery, Outcome, Presenter, RequestGeneration, Ticket, WeatherApp};
pub use config::{Config, Endpoints};
pub use country::{BuiltinCountries, CountryNames};
pub use error::{AppError, GeolocationErrorKind};
pub use fetcher::WeatherFetcher;
pub use forecast::{day_label, reduce_daily};
pub use location::{DeviceLocation, NoLocation, StaticLocation};
pub use model::{Coordinate, CurrentConditions, ForecastSample, LocationQuery, WeatherReport};
pub use provider::{OpenWeatherClient, SourceError, WeatherSource};
pub use resolver::Resolver;
