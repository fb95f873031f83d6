use crate::{
    Config, DetailedWeather, ForecastRequest,
    error::FetchError,
    provider::tomorrow::TomorrowProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod tomorrow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Tomorrow,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Tomorrow => "tomorrow",
        }
    }

    /// Environment variable that overrides the stored API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::Tomorrow => "TOMORROW_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Hourly forecast for `request`, at most eight snapshots.
    async fn get_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<Vec<DetailedWeather>, FetchError>;

    /// Same as [`get_forecast`](Self::get_forecast), but every failure is
    /// logged and reported as `None`.
    async fn get_forecast_or_none(&self, request: &ForecastRequest) -> Option<Vec<DetailedWeather>> {
        match self.get_forecast(request).await {
            Ok(forecast) => Some(forecast),
            Err(err) => {
                tracing::error!(
                    location = %request.location,
                    kind = ?err.kind(),
                    "Weather service error: {err}"
                );
                None
            }
        }
    }
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> Result<Box<dyn ForecastProvider>, FetchError> {
    let api_key = config
        .provider_api_key(id)
        .ok_or(FetchError::MissingApiKey { provider: id.as_str() })?;

    let boxed: Box<dyn ForecastProvider> = match id {
        ProviderId::Tomorrow => {
            Box::new(TomorrowProvider::from_settings(api_key.to_owned(), &config.fetch)?)
        }
    };

    Ok(boxed)
}

/// Build the provider for `id` and fetch once. A missing key fails without
/// touching the network.
pub async fn fetch_forecast(
    id: ProviderId,
    config: &Config,
    request: &ForecastRequest,
) -> Result<Vec<DetailedWeather>, FetchError> {
    provider_from_config(id, config)?.get_forecast(request).await
}

/// [`fetch_forecast`] with every failure logged and swallowed.
pub async fn fetch_forecast_or_none(
    id: ProviderId,
    config: &Config,
    request: &ForecastRequest,
) -> Option<Vec<DetailedWeather>> {
    match provider_from_config(id, config) {
        Ok(provider) => provider.get_forecast_or_none(request).await,
        Err(err) => {
            tracing::error!(provider = %id, kind = ?err.kind(), "{err}");
            None
        }
    }
}
