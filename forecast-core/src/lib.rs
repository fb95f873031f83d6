//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast provider abstraction and the Tomorrow.io fetcher
//! - Normalization of raw hourly data into stable snapshots
//! - Derived insights (lifestyle tips, sun position)
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod condition;
pub mod config;
pub mod error;
pub mod insights;
pub mod model;
pub mod normalize;
pub mod provider;

pub use condition::Condition;
pub use config::{Config, FetchSettings, ProviderConfig};
pub use error::{FailureKind, FetchError};
pub use insights::{LifestyleTip, SunPosition, Tone, Visibility};
pub use model::{DetailedWeather, ForecastRequest, WeatherSnapshot};
pub use provider::{
    ForecastProvider, ProviderId, fetch_forecast, fetch_forecast_or_none, provider_from_config,
};
