use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::AppError,
    model::{Coordinate, LocationQuery},
    provider::WeatherSource,
};

/// Turns a city name or a known position into a coordinate.
#[derive(Debug, Clone)]
pub struct Resolver {
    source: Arc<dyn WeatherSource>,
}

impl Resolver {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    pub async fn resolve(&self, query: &LocationQuery) -> Result<Coordinate, AppError> {
        match query {
            LocationQuery::City(name) => self.resolve_city(name).await,
            LocationQuery::Coordinate(coord) => Ok(*coord),
        }
    }

    /// Geocode `name` and take the first match. Blank input never reaches the network.
    pub async fn resolve_city(&self, name: &str) -> Result<Coordinate, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::empty_city());
        }

        debug!(city = name, "Geocoding");

        let candidates = self.source.geocode(name).await.map_err(|e| {
            warn!(city = name, error = %e, "Geocoding failed");
            AppError::Transport(e.to_string())
        })?;

        // First match wins, even when several places share the name.
        let best = candidates.into_iter().next().ok_or(AppError::NotFound)?;

        info!(
            city = name,
            matched = %best.name,
            coordinate = %best.coordinate,
            "Resolved city"
        );
        Ok(best.coordinate)
    }
}
