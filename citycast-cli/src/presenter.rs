//! Terminal rendering of lookup outcomes.

use chrono::{DateTime, Local, TimeZone};
use citycast_core::{
    CurrentConditions, Endpoints, ForecastSample, Outcome, Presenter, WeatherReport, day_label,
};
use std::fmt::Write as _;

/// Prints reports to stdout and failures to stderr.
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    endpoints: Endpoints,
}

impl TerminalPresenter {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

impl Presenter for TerminalPresenter {
    fn present(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Success(report) => {
                print!("{}", render_report(report, &Local::now(), &self.endpoints));
            }
            Outcome::Failure(err) => eprintln!("{}", err.user_message()),
        }
    }
}

/// Nearest integer with halves rounded up, e.g. -2.5 → -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Rounded value, or `--` when upstream did not report it.
fn rounded_or_dash(value: Option<f64>) -> String {
    value
        .map(|v| round_half_up(v).to_string())
        .unwrap_or_else(|| "--".to_string())
}

fn clock_time<Tz: TimeZone>(epoch: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp(epoch, 0)
        .map(|t| t.with_timezone(tz).format("%-I:%M %p").to_string())
        .unwrap_or_else(|| "--".to_string())
}

pub fn render_report<Tz: TimeZone>(
    report: &WeatherReport,
    now: &DateTime<Tz>,
    endpoints: &Endpoints,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    render_current(&mut out, &report.current, &now.timezone(), endpoints);

    if !report.daily.is_empty() {
        let _ = writeln!(out, "\n{}-day forecast", report.daily.len());
        for sample in &report.daily {
            render_sample(&mut out, sample, now, endpoints);
        }
    }

    out
}

fn render_current<Tz: TimeZone>(
    out: &mut String,
    current: &CurrentConditions,
    tz: &Tz,
    endpoints: &Endpoints,
) where
    Tz::Offset: std::fmt::Display,
{
    match &current.country_name {
        Some(country) => {
            let _ = writeln!(out, "{}, {}", current.location_name, country);
        }
        None => {
            let _ = writeln!(out, "{}", current.location_name);
        }
    }
    let _ = writeln!(
        out,
        "  {}°C  {}",
        round_half_up(current.temperature_c),
        current.description
    );
    let _ = writeln!(out, "  Feels like {}°C", round_half_up(current.feels_like_c));
    let _ = writeln!(
        out,
        "  Visibility {} km · Humidity {}% · Wind {} km/h · Pressure {} hPa",
        rounded_or_dash(current.visibility_km),
        current.humidity_pct,
        round_half_up(current.wind_speed_kmh),
        round_half_up(current.pressure_hpa),
    );
    let _ = writeln!(
        out,
        "  Sunrise {} · Sunset {}",
        clock_time(current.sunrise, tz),
        clock_time(current.sunset, tz)
    );
    let _ = writeln!(out, "  Icon {}", endpoints.icon_for(&current.icon_id, true));
}

fn render_sample<Tz: TimeZone>(
    out: &mut String,
    sample: &ForecastSample,
    now: &DateTime<Tz>,
    endpoints: &Endpoints,
) {
    let _ = writeln!(
        out,
        "  {:<10} {:>4}°C  {:<20} {}",
        day_label(sample.timestamp, now),
        round_half_up(sample.temperature_c),
        sample.description,
        endpoints.icon_for(&sample.icon_id, false)
    );
}
