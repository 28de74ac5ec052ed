//! Sources for "where am I".

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::GeolocationErrorKind, model::Coordinate};

/// Single-shot device position lookup. Implementations must not retry.
#[async_trait]
pub trait DeviceLocation: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinate, GeolocationErrorKind>;
}

/// Reports a position known up front, e.g. from the command line or the config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticLocation {
    position: Option<Coordinate>,
}

impl StaticLocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl DeviceLocation for StaticLocation {
    async fn current_position(&self) -> Result<Coordinate, GeolocationErrorKind> {
        self.position.ok_or(GeolocationErrorKind::PositionUnavailable)
    }
}

/// Used where no position source exists at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl DeviceLocation for NoLocation {
    async fn current_position(&self) -> Result<Coordinate, GeolocationErrorKind> {
        Err(GeolocationErrorKind::Unsupported)
    }
}
