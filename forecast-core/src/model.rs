use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// Location queried when the caller does not supply one.
pub const DEFAULT_LOCATION: &str = "London";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    /// Place name or a "lat,lng" pair.
    pub location: String,
    /// Name to show instead of whatever the provider resolves.
    pub display_name: Option<String>,
}

impl ForecastRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self { location: location.into(), display_name: None }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

/// One hourly forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Hour label such as "3 PM".
    pub time_label: String,
    /// Provider timestamp, verbatim.
    pub raw_time: String,
    /// Degrees Celsius.
    pub temp: i64,
    pub condition: Condition,
    /// km/h.
    pub wind_speed: i64,
    /// Degrees.
    pub wind_direction: f64,
    pub is_day: bool,
}

/// A snapshot plus the per-location detail shown alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedWeather {
    #[serde(flatten)]
    pub snapshot: WeatherSnapshot,
    pub location_name: String,
    pub sunrise_time: String,
    pub sunset_time: String,
    /// hPa.
    pub pressure: i64,
    /// Percent.
    pub humidity: i64,
    /// km.
    pub visibility: i64,
    pub uv_index: f64,
    /// Percent.
    pub cloud_cover: f64,
}

impl std::ops::Deref for DetailedWeather {
    type Target = WeatherSnapshot;

    fn deref(&self) -> &Self::Target {
        &self.snapshot
    }
}
