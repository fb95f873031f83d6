use async_trait::async_trait;
use chrono::{FixedOffset, Local, Offset, Utc};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use crate::{
    cache::{CACHE_FILE, ForecastCache},
    config::FetchSettings,
    error::FetchError,
    model::{DetailedWeather, ForecastRequest},
    normalize::{TmForecastResponse, normalize},
};

use super::ForecastProvider;

pub const TOMORROW_FORECAST_URL: &str = "https://api.tomorrow.io/v4/weather/forecast";

/// Fields requested for every timestep.
pub const FIELDS: &[&str] = &[
    "temperature",
    "weatherCode",
    "windSpeed",
    "windDirection",
    "pressureSurfaceLevel",
    "humidity",
    "visibility",
    "uvIndex",
    "sunriseTime",
    "sunsetTime",
    "cloudCover",
];

#[derive(Debug)]
pub struct TomorrowProvider {
    api_key: String,
    base_url: String,
    http: Client,
    retry_delay: Duration,
    cache: ForecastCache,
    offset: Option<FixedOffset>,
}

impl TomorrowProvider {
    pub fn new(api_key: String) -> Self {
        let settings = FetchSettings::default();
        Self {
            api_key,
            base_url: TOMORROW_FORECAST_URL.to_string(),
            http: Client::new(),
            retry_delay: settings.retry_delay(),
            cache: ForecastCache::new(settings.cache_ttl(), ForecastCache::default_path()),
            offset: None,
        }
    }

    pub fn from_settings(api_key: String, settings: &FetchSettings) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(settings.timeout()).build()?;
        let cache_path = match &settings.cache_dir {
            Some(dir) => Some(dir.join(CACHE_FILE)),
            None => ForecastCache::default_path(),
        };

        Ok(Self {
            api_key,
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| TOMORROW_FORECAST_URL.to_string()),
            http,
            retry_delay: settings.retry_delay(),
            cache: ForecastCache::new(settings.cache_ttl(), cache_path),
            offset: None,
        })
    }

    /// Pin the UTC offset used for hour labels and day/night instead of
    /// the machine's local one.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset.unwrap_or_else(|| Local::now().offset().fix())
    }

    async fn send(&self, location: &str) -> Result<Response, FetchError> {
        let fields = FIELDS.join(",");

        tracing::debug!(%location, url = %self.base_url, "requesting forecast");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("location", location),
                ("timesteps", "1h,1d"),
                ("units", "metric"),
                ("apikey", self.api_key.as_str()),
                ("fields", fields.as_str()),
            ])
            .send()
            .await?;

        Ok(res)
    }

    /// Body of a successful response. HTTP 429 is retried exactly once.
    async fn fetch_body(&self, location: &str) -> Result<String, FetchError> {
        let mut res = self.send(location).await?;

        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(
                %location,
                delay_ms = self.retry_delay.as_millis() as u64,
                "rate limited, retrying once"
            );
            tokio::time::sleep(self.retry_delay).await;
            res = self.send(location).await?;

            if res.status() == StatusCode::TOO_MANY_REQUESTS {
                return Err(FetchError::RateLimited { attempts: 2 });
            }
        }

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Http { status, body: truncate_body(&body) });
        }

        Ok(body)
    }
}

#[async_trait]
impl ForecastProvider for TomorrowProvider {
    async fn get_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<Vec<DetailedWeather>, FetchError> {
        let key = cache_key(request);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(location = %request.location, "forecast served from cache");
            return Ok(hit);
        }

        let body = self.fetch_body(&request.location).await?;
        let parsed: TmForecastResponse = serde_json::from_str(&body)?;
        let forecast = normalize(&parsed, request, Utc::now(), self.local_offset())?;

        tracing::info!(
            location = %request.location,
            snapshots = forecast.len(),
            "forecast fetched"
        );

        self.cache.insert(key, forecast.clone());
        Ok(forecast)
    }
}

fn cache_key(request: &ForecastRequest) -> String {
    format!("{}\u{1f}{}", request.location, request.display_name.as_deref().unwrap_or_default())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
