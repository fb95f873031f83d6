use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{Config, ForecastRequest, ProviderId, fetch_forecast_or_none, model::DEFAULT_LOCATION};
use inquire::{Password, PasswordDisplayMode};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Hourly weather timeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Tomorrow.io API key.
    Configure,

    /// Show the next hours of weather for a place.
    Show {
        /// Place name or "lat,lng".
        #[arg(default_value = DEFAULT_LOCATION, allow_hyphen_values = true)]
        location: String,

        /// Name to display instead of the resolved one.
        #[arg(long)]
        name: Option<String>,

        /// Print the normalized forecast as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, name, json } => show(location, name, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let id = ProviderId::Tomorrow;
    let mut config = Config::load()?;

    let key = Password::new("Tomorrow.io API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, key.trim().to_string());
    config.save()?;

    tracing::info!(provider = %id, "API key saved");
    println!("Saved API key for '{id}' to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: String, name: Option<String>, json: bool) -> anyhow::Result<()> {
    let id = ProviderId::Tomorrow;
    let mut config = Config::load()?;
    config.override_api_key(id, std::env::var(id.api_key_env()).ok());

    let mut request = ForecastRequest::new(location);
    if let Some(name) = name {
        request = request.with_display_name(name);
    }

    let Some(forecast) = fetch_forecast_or_none(id, &config, &request).await else {
        bail!(render::UNAVAILABLE);
    };

    if forecast.is_empty() {
        bail!(render::UNAVAILABLE);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        print!("{}", render::timeline(&forecast));
    }

    Ok(())
}
