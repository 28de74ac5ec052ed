//! Error types shared by every stage of a lookup.
//!
//! Each variant knows the single line of text the user should see, so the
//! presenter never has to inspect error internals.

use thiserror::Error;

/// Why the device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeolocationErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
    /// No position source exists at all on this system.
    Unsupported,
}

impl GeolocationErrorKind {
    /// Map a W3C `GeolocationPositionError.code` to a kind.
    ///
    /// Codes outside 1..=3 become `Unknown` rather than leaking through.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Location access denied by user",
            Self::PositionUnavailable => "Location information is unavailable",
            Self::Timeout => "Location request timed out",
            Self::Unknown => "An unknown error occurred while retrieving location",
            Self::Unsupported => "Geolocation is not supported on this system",
        }
    }
}

impl std::fmt::Display for GeolocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything that can end a lookup early.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("City not found")]
    NotFound,

    /// The geocoding call could not complete or returned garbage.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Current conditions, forecast, or both could not be retrieved.
    #[error("Weather data not available")]
    DataUnavailable,

    #[error("Geolocation error: {0}")]
    Geolocation(GeolocationErrorKind),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn empty_city() -> Self {
        Self::Validation("Please enter a city name".to_string())
    }

    /// The text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound => "City not found".to_string(),
            AppError::Transport(_) => "City not found. Please try again.".to_string(),
            AppError::DataUnavailable => "Weather data not available".to_string(),
            AppError::Geolocation(kind) => kind.message().to_string(),
            AppError::Config(msg) => msg.clone(),
        }
    }
}

impl From<GeolocationErrorKind> for AppError {
    fn from(kind: GeolocationErrorKind) -> Self {
        AppError::Geolocation(kind)
    }
}
