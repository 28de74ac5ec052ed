use chrono::TimeZone;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    country::CountryNames,
    error::AppError,
    forecast::reduce_daily,
    model::{Coordinate, CurrentConditions, ForecastSample, WeatherReport},
    provider::{Condition, RawCurrent, RawForecastEntry, WeatherSource},
};

/// m/s to km/h.
const MPS_TO_KMH: f64 = 3.6;
const METERS_PER_KM: f64 = 1000.0;

/// Pulls current conditions and the forecast for a coordinate and shapes them for display.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    source: Arc<dyn WeatherSource>,
    countries: Arc<dyn CountryNames>,
}

impl WeatherFetcher {
    pub fn new(source: Arc<dyn WeatherSource>, countries: Arc<dyn CountryNames>) -> Self {
        Self { source, countries }
    }

    /// Fetch both resources concurrently and reduce the forecast in `tz`.
    ///
    /// Either call failing fails the whole fetch with [`AppError::DataUnavailable`].
    pub async fn fetch<Tz: TimeZone>(
        &self,
        coord: Coordinate,
        tz: &Tz,
    ) -> Result<WeatherReport, AppError> {
        debug!(coordinate = %coord, "Fetching current conditions and forecast");

        let (current, forecast) =
            tokio::join!(self.source.current(coord), self.source.forecast(coord));

        let (current, forecast) = match (current, forecast) {
            (Ok(c), Ok(f)) => (c, f),
            (current, forecast) => {
                if let Err(e) = &current {
                    warn!(coordinate = %coord, error = %e, "Current conditions unavailable");
                }
                if let Err(e) = &forecast {
                    warn!(coordinate = %coord, error = %e, "Forecast unavailable");
                }
                return Err(AppError::DataUnavailable);
            }
        };

        let current = self.shape_current(current)?;
        let samples = forecast
            .into_iter()
            .map(shape_sample)
            .collect::<Result<Vec<_>, _>>()?;

        let daily = reduce_daily(&samples, tz);
        debug!(
            samples = samples.len(),
            days = daily.len(),
            "Reduced forecast to daily samples"
        );

        Ok(WeatherReport { current, daily })
    }

    fn shape_current(&self, raw: RawCurrent) -> Result<CurrentConditions, AppError> {
        let condition = first_condition(raw.conditions, "current conditions")?;

        Ok(CurrentConditions {
            country_name: raw.country.as_deref().map(|c| self.countries.display_name(c)),
            location_name: raw.name,
            country_code: raw.country,
            temperature_c: raw.temp,
            feels_like_c: raw.feels_like,
            description: condition.description,
            icon_id: condition.icon,
            humidity_pct: raw.humidity,
            pressure_hpa: raw.pressure,
            visibility_km: raw.visibility.map(meters_to_km),
            wind_speed_kmh: mps_to_kmh(raw.wind_speed),
            sunrise: raw.sunrise,
            sunset: raw.sunset,
        })
    }
}

fn shape_sample(raw: RawForecastEntry) -> Result<ForecastSample, AppError> {
    let condition = first_condition(raw.conditions, "forecast sample")?;

    Ok(ForecastSample {
        timestamp: raw.dt,
        temperature_c: raw.temp,
        description: condition.description,
        icon_id: condition.icon,
    })
}

/// Only the first reported condition is shown; none at all means a malformed payload.
fn first_condition(conditions: Vec<Condition>, what: &str) -> Result<Condition, AppError> {
    conditions.into_iter().next().ok_or_else(|| {
        warn!("Upstream {what} carried no weather condition");
        AppError::DataUnavailable
    })
}

pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * MPS_TO_KMH
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / METERS_PER_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{country::BuiltinCountries, testing::FakeSource};
    use chrono::Utc;

    fn fetcher(source: Arc<FakeSource>) -> WeatherFetcher {
        WeatherFetcher::new(source, Arc::new(BuiltinCountries))
    }

    #[test]
    fn unit_conversions() {
        assert!((mps_to_kmh(10.0) - 36.0).abs() < 1e-9);
        assert!((meters_to_km(8000.0) - 8.0).abs() < 1e-9);
        assert!((meters_to_km(10_000.0) - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn shapes_current_conditions() {
        let source = Arc::new(FakeSource::default());
        let report = fetcher(source.clone())
            .fetch(Coordinate::new(51.5, -0.12), &Utc)
            .await
            .expect("fetch should succeed");

        let current = &report.current;
        assert_eq!(current.location_name, "London");
        assert_eq!(current.country_code.as_deref(), Some("GB"));
        assert_eq!(current.country_name.as_deref(), Some("United Kingdom"));
        assert!((current.wind_speed_kmh - 36.0).abs() < 1e-9);
        assert_eq!(current.visibility_km, Some(8.0));
        assert!((current.temperature_c - 11.6).abs() < 1e-9);
        assert_eq!(current.description, "light rain");
        assert_eq!(current.icon_id, "10d");

        assert_eq!(source.current_calls(), 1);
        assert_eq!(source.forecast_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_country_code_passes_through() {
        let mut raw = FakeSource::sample_current();
        raw.country = Some("ZZ".into());
        let source = Arc::new(FakeSource::default().with_current(raw));

        let report = fetcher(source)
            .fetch(Coordinate::new(0.0, 0.0), &Utc)
            .await
            .expect("fetch should succeed");

        assert_eq!(report.current.country_name.as_deref(), Some("ZZ"));
    }

    #[tokio::test]
    async fn missing_country_and_visibility_stay_absent() {
        let mut raw = FakeSource::sample_current();
        raw.country = None;
        raw.visibility = None;
        let source = Arc::new(FakeSource::default().with_current(raw));

        let current = fetcher(source)
            .fetch(Coordinate::new(0.0, -30.0), &Utc)
            .await
            .expect("fetch should succeed")
            .current;

        assert_eq!(current.country_code, None);
        assert_eq!(current.country_name, None);
        assert_eq!(current.visibility_km, None);
        assert!((current.wind_speed_kmh - 36.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn forecast_is_reduced_to_daily_samples() {
        let source = Arc::new(FakeSource::default());
        let report = fetcher(source)
            .fetch(Coordinate::new(51.5, -0.12), &Utc)
            .await
            .expect("fetch should succeed");

        assert_eq!(report.daily.len(), 5);
        assert!(report.daily.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    fn entry(dt: i64, temp: f64) -> RawForecastEntry {
        RawForecastEntry {
            dt,
            temp,
            conditions: vec![Condition {
                description: "broken clouds".into(),
                icon: "04d".into(),
            }],
        }
    }

    #[tokio::test]
    async fn partial_first_day_and_gaps_keep_one_sample_per_day() {
        // 2024-05-01T00:00:00Z
        let day = |d: i64, h: i64| 1_714_521_600 + d * 86_400 + h * 3600;
        let mut series: Vec<_> = [15, 18, 21].iter().map(|&h| entry(day(0, h), 20.0)).collect();
        series.extend((0..8).map(|i| entry(day(1, i * 3), 10.0 + i as f64)));
        series.push(entry(day(2, 9), 5.0));

        let source = Arc::new(FakeSource::default().with_forecast(series));
        let daily = fetcher(source)
            .fetch(Coordinate::new(51.5, -0.12), &Utc)
            .await
            .expect("fetch should succeed")
            .daily;

        let timestamps: Vec<i64> = daily.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![day(0, 15), day(1, 12), day(2, 9)]);
        assert!((daily[1].temperature_c - 14.0).abs() < 1e-9);
        assert_eq!(daily[0].icon_id, "04d");
    }

    #[tokio::test]
    async fn empty_forecast_still_reports_current_conditions() {
        let source = Arc::new(FakeSource::default().with_forecast(Vec::new()));
        let report = fetcher(source)
            .fetch(Coordinate::new(51.5, -0.12), &Utc)
            .await
            .expect("fetch should succeed");

        assert!(report.daily.is_empty());
        assert_eq!(report.current.location_name, "London");
    }

    #[tokio::test]
    async fn current_failure_is_data_unavailable() {
        let source = Arc::new(FakeSource::default().failing_current());
        let err = fetcher(source.clone())
            .fetch(Coordinate::new(51.5, -0.12), &Utc)
            .await
            .unwrap_err();

        assert_eq!(err, AppError::DataUnavailable);
        // The forecast is still requested; the join waits for both.
        assert_eq!(source.forecast_calls(), 1);
    }

    #[tokio::test]
    async fn forecast_failure_is_data_unavailable() {
        let source = Arc::new(FakeSource::default().failing_forecast());
        let err = fetcher(source)
            .fetch(Coordinate::new(51.5, -0.12), &Utc)
            .await
            .unwrap_err();

        assert_eq!(err, AppError::DataUnavailable);
    }

    #[tokio::test]
    async fn missing_weather_condition_fails_closed() {
        let mut raw = FakeSource::sample_current();
        raw.conditions.clear();
        let source = Arc::new(FakeSource::default().with_current(raw));

        let err = fetcher(source)
            .fetch(Coordinate::new(51.5, -0.12), &Utc)
            .await
            .unwrap_err();

        assert_eq!(err, AppError::DataUnavailable);
    }
}
