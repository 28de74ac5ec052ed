use anyhow::Context;
use citycast_core::{Config, Coordinate, StaticLocation, WeatherApp};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use std::sync::Arc;

use crate::presenter::TerminalPresenter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Current weather and a 5-day forecast")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and, optionally, a home position.
    Configure {
        /// API key; prompted for when omitted.
        #[arg(long)]
        api_key: Option<String>,

        /// Home latitude used by `citycast here`.
        #[arg(long, requires = "home_lon", allow_negative_numbers = true)]
        home_lat: Option<f64>,

        /// Home longitude used by `citycast here`.
        #[arg(long, requires = "home_lat", allow_negative_numbers = true)]
        home_lon: Option<f64>,
    },

    /// Show weather for a city.
    Show {
        /// City name, e.g. "Paris" or "Springfield, IL".
        city: String,
    },

    /// Show weather for the current position.
    Here {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Prompt for city names until cancelled.
    Interactive,
}

/// Explicit coordinates win over the configured home position.
fn device_position(
    lat: Option<f64>,
    lon: Option<f64>,
    home: Option<Coordinate>,
) -> Option<Coordinate> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
        _ => home,
    }
}

/// Only `here` looks at the device position; city searches never do.
fn position_for(command: &Command, home: Option<Coordinate>) -> Option<Coordinate> {
    match command {
        Command::Here { lat, lon } => device_position(*lat, *lon, home),
        _ => None,
    }
}

fn is_quit(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "quit" | "exit" | ":q")
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        let position = position_for(&self.command, config.home);

        match self.command {
            Command::Configure {
                api_key,
                home_lat,
                home_lon,
            } => {
                let api_key = match api_key {
                    Some(key) => key,
                    None => Password::new("OpenWeather API key:")
                        .without_confirmation()
                        .with_display_mode(PasswordDisplayMode::Masked)
                        .prompt()
                        .context("API key prompt failed")?,
                };
                config.set_api_key(api_key.trim().to_string());

                if let Some(home) = device_position(home_lat, home_lon, None) {
                    config.home = Some(home);
                }

                config.save()?;
                println!(
                    "Configuration saved to {}",
                    Config::config_file_path()?.display()
                );
            }
            Command::Show { city } => {
                let app = build_app(&config, position)?;
                app.search(&city).await;
            }
            Command::Here { .. } => {
                let app = build_app(&config, position)?;
                app.locate().await;
            }
            Command::Interactive => {
                let app = build_app(&config, position)?;
                println!("Type a city name (or `quit` to leave).");

                loop {
                    let input = match Text::new("City:").prompt() {
                        Ok(input) => input,
                        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                            break;
                        }
                        Err(e) => return Err(e).context("City prompt failed"),
                    };

                    if is_quit(&input) {
                        break;
                    }
                    app.search(&input).await;
                    println!();
                }
            }
        }

        Ok(())
    }
}

fn build_app(
    config: &Config,
    position: Option<Coordinate>,
) -> anyhow::Result<WeatherApp<TerminalPresenter>> {
    tracing::debug!(
        base_url = %config.endpoints.base_url,
        has_position = position.is_some(),
        "Building weather app"
    );

    let presenter = TerminalPresenter::new(config.endpoints.clone());
    let location = Arc::new(StaticLocation::new(position));

    Ok(WeatherApp::from_config(config, location, presenter)?)
}
