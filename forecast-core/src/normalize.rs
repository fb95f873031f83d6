//! Reshapes a raw provider forecast into [`DetailedWeather`] records.
//!
//! The normalizer is pure: the current time and the local UTC offset are
//! passed in, so the same payload always yields the same snapshots.

use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::{
    condition::Condition,
    error::FetchError,
    model::{DetailedWeather, ForecastRequest, WeatherSnapshot},
};

/// Hourly entries kept per forecast.
pub const MAX_SNAPSHOTS: usize = 8;

/// Shown instead of a bare coordinate pair.
pub const CURRENT_LOCATION: &str = "Current Location";

/// m/s to km/h.
const MPS_TO_KMH: f64 = 3.6;

static COORDINATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d+(\.\d+)?,\s*-?\d+(\.\d+)?$").expect("coordinate pattern is valid")
});

#[derive(Debug, Clone, Deserialize)]
pub struct TmForecastResponse {
    timelines: TmTimelines,
    #[serde(default)]
    location: Option<TmLocation>,
}

#[derive(Debug, Clone, Deserialize)]
struct TmTimelines {
    hourly: Vec<TmEntry<TmHourlyValues>>,
    #[serde(default)]
    daily: Vec<TmEntry<TmDailyValues>>,
}

#[derive(Debug, Clone, Deserialize)]
struct TmEntry<V> {
    time: String,
    values: V,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TmHourlyValues {
    temperature: f64,
    weather_code: Option<i64>,
    wind_speed: f64,
    wind_direction: Option<f64>,
    pressure_surface_level: Option<f64>,
    humidity: Option<f64>,
    visibility: Option<f64>,
    uv_index: Option<f64>,
    cloud_cover: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TmDailyValues {
    sunrise_time: Option<String>,
    sunset_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TmLocation {
    name: Option<String>,
}

impl TmForecastResponse {
    fn provider_name(&self) -> Option<&str> {
        self.location.as_ref().and_then(|l| l.name.as_deref())
    }
}

/// Convert the first [`MAX_SNAPSHOTS`] hourly entries of `response`.
///
/// `now` fills in missing sunrise/sunset times; `offset` decides the local
/// hour used for labels and day/night.
pub fn normalize(
    response: &TmForecastResponse,
    request: &ForecastRequest,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<Vec<DetailedWeather>, FetchError> {
    let location_name = resolve_location_name(
        request.display_name.as_deref(),
        response.provider_name(),
        &request.location,
    );

    let today = response.timelines.daily.first().map(|d| &d.values);
    let fallback = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let sunrise_time = today
        .and_then(|v| v.sunrise_time.clone())
        .unwrap_or_else(|| fallback.clone());
    let sunset_time = today
        .and_then(|v| v.sunset_time.clone())
        .unwrap_or(fallback);

    response
        .timelines
        .hourly
        .iter()
        .take(MAX_SNAPSHOTS)
        .map(|entry| {
            let time = DateTime::parse_from_rfc3339(&entry.time)
                .map_err(|e| FetchError::Shape(format!("bad hourly time '{}': {e}", entry.time)))?
                .with_timezone(&offset);
            let v = &entry.values;

            Ok(DetailedWeather {
                snapshot: WeatherSnapshot {
                    time_label: hour_label(&time),
                    raw_time: entry.time.clone(),
                    temp: round(v.temperature),
                    condition: v.weather_code.map(Condition::from_code).unwrap_or_default(),
                    wind_speed: wind_kmh(v.wind_speed),
                    wind_direction: v.wind_direction.unwrap_or_default(),
                    is_day: is_daytime(time.hour()),
                },
                location_name: location_name.clone(),
                sunrise_time: sunrise_time.clone(),
                sunset_time: sunset_time.clone(),
                pressure: round(v.pressure_surface_level.unwrap_or_default()),
                humidity: round(v.humidity.unwrap_or_default()),
                visibility: round(v.visibility.unwrap_or_default()),
                uv_index: v.uv_index.unwrap_or_default(),
                cloud_cover: v.cloud_cover.unwrap_or_default(),
            })
        })
        .collect()
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Provider wind speed (m/s) as whole km/h.
pub fn wind_kmh(mps: f64) -> i64 {
    round(mps * MPS_TO_KMH)
}

/// Daytime is any local hour strictly between 6 and 20.
pub fn is_daytime(hour: u32) -> bool {
    hour > 6 && hour < 20
}

/// Label like "3 PM" or "12 AM".
pub fn hour_label(time: &DateTime<FixedOffset>) -> String {
    time.format("%-I %p").to_string()
}

/// Pick the display name: explicit name, then provider name, then the raw
/// query. Bare coordinates become [`CURRENT_LOCATION`].
pub fn resolve_location_name(
    display_name: Option<&str>,
    provider_name: Option<&str>,
    location: &str,
) -> String {
    let non_empty = |s: &&str| !s.trim().is_empty();
    let name = display_name
        .filter(non_empty)
        .or(provider_name.filter(non_empty))
        .unwrap_or(location);

    if is_coordinate_pair(name) {
        CURRENT_LOCATION.to_string()
    } else {
        name.to_string()
    }
}

/// A bare "lat,lng" pair such as `51.5074, -0.1278`.
pub fn is_coordinate_pair(s: &str) -> bool {
    COORDINATE_PAIR.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CODE_TABLE;
    use chrono::TimeZone;
    use serde_json::json;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn hour(h: u32, code: i64) -> serde_json::Value {
        json!({
            "time": format!("2025-06-01T{h:02}:00:00Z"),
            "values": {
                "temperature": 18.5,
                "weatherCode": code,
                "windSpeed": 5.0,
                "windDirection": 225.4,
                "pressureSurfaceLevel": 1012.6,
                "humidity": 71.2,
                "visibility": 9.7,
                "uvIndex": 4,
                "cloudCover": 35.5
            }
        })
    }

    fn payload(hours: Vec<serde_json::Value>) -> TmForecastResponse {
        serde_json::from_value(json!({
            "timelines": {
                "hourly": hours,
                "daily": [{
                    "time": "2025-06-01T04:00:00Z",
                    "values": {
                        "sunriseTime": "2025-06-01T03:48:00Z",
                        "sunsetTime": "2025-06-01T20:11:00Z"
                    }
                }]
            },
            "location": { "lat": 51.5, "lon": -0.12, "name": "London, Greater London, England, United Kingdom" }
        }))
        .unwrap()
    }

    #[test]
    fn maps_every_field() {
        let resp = payload(vec![hour(15, 4001)]);
        let out = normalize(&resp, &ForecastRequest::new("london"), now(), utc()).unwrap();

        assert_eq!(out.len(), 1);
        let w = &out[0];
        assert_eq!(w.time_label, "3 PM");
        assert_eq!(w.raw_time, "2025-06-01T15:00:00Z");
        assert_eq!(w.temp, 19);
        assert_eq!(w.condition, Condition::Rain);
        assert_eq!(w.wind_speed, 18);
        assert_eq!(w.wind_direction, 225.4);
        assert!(w.is_day);
        assert_eq!(w.location_name, "London, Greater London, England, United Kingdom");
        assert_eq!(w.sunrise_time, "2025-06-01T03:48:00Z");
        assert_eq!(w.sunset_time, "2025-06-01T20:11:00Z");
        assert_eq!(w.pressure, 1013);
        assert_eq!(w.humidity, 71);
        assert_eq!(w.visibility, 10);
        assert_eq!(w.uv_index, 4.0);
        assert_eq!(w.cloud_cover, 35.5);
    }

    #[test]
    fn keeps_only_first_eight_hours() {
        let hours = (0..24).map(|h| hour(h, 1000)).collect();
        let out = normalize(&payload(hours), &ForecastRequest::new("x"), now(), utc()).unwrap();

        assert_eq!(out.len(), MAX_SNAPSHOTS);
        assert_eq!(out[0].raw_time, "2025-06-01T00:00:00Z");
        assert_eq!(out[7].raw_time, "2025-06-01T07:00:00Z");
    }

    #[test]
    fn fewer_than_eight_hours_are_all_kept() {
        let hours = (0..3).map(|h| hour(h, 1000)).collect();
        let out = normalize(&payload(hours), &ForecastRequest::new("x"), now(), utc()).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn weather_codes_follow_table() {
        for (code, expected) in CODE_TABLE {
            let out =
                normalize(&payload(vec![hour(9, *code)]), &ForecastRequest::new("x"), now(), utc())
                    .unwrap();
            assert_eq!(out[0].condition, *expected, "code {code}");
        }

        let out = normalize(&payload(vec![hour(9, 6201)]), &ForecastRequest::new("x"), now(), utc())
            .unwrap();
        assert_eq!(out[0].condition, Condition::Clear);
    }

    #[test]
    fn wind_speed_is_rounded_kmh() {
        for mps in [0.0, 0.1, 0.14, 1.0, 2.5, 4.17, 10.0, 33.3, 100.0] {
            assert_eq!(wind_kmh(mps), (mps * 3.6_f64).round() as i64, "{mps} m/s");
        }
    }

    #[test]
    fn rounding_sends_halves_up() {
        assert_eq!(round(2.5), 3);
        assert_eq!(round(-2.5), -2);
        assert_eq!(round(-2.6), -3);
        assert_eq!(round(0.49), 0);
        assert_eq!(round(0.49999999999999994), 0);
        assert_eq!(round(-0.5), 0);
        assert_eq!(round(1012.6), 1013);
    }

    #[test]
    fn day_is_seven_through_nineteen() {
        for h in 0..24 {
            assert_eq!(is_daytime(h), (7..=19).contains(&h), "hour {h}");
        }
    }

    #[test]
    fn day_uses_local_offset() {
        // 05:00Z is 07:00 at +02:00.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let out = normalize(&payload(vec![hour(5, 1000)]), &ForecastRequest::new("x"), now(), plus_two)
            .unwrap();
        assert!(out[0].is_day);
        assert_eq!(out[0].time_label, "7 AM");

        let out = normalize(&payload(vec![hour(5, 1000)]), &ForecastRequest::new("x"), now(), utc())
            .unwrap();
        assert!(!out[0].is_day);
    }

    #[test]
    fn hour_labels() {
        let at = |h| utc().with_ymd_and_hms(2025, 1, 1, h, 0, 0).unwrap();
        assert_eq!(hour_label(&at(0)), "12 AM");
        assert_eq!(hour_label(&at(9)), "9 AM");
        assert_eq!(hour_label(&at(12)), "12 PM");
        assert_eq!(hour_label(&at(23)), "11 PM");
    }

    #[test]
    fn missing_daily_defaults_to_now() {
        let resp: TmForecastResponse = serde_json::from_value(json!({
            "timelines": { "hourly": [hour(10, 1000)] }
        }))
        .unwrap();
        let out = normalize(&resp, &ForecastRequest::new("Oslo"), now(), utc()).unwrap();

        assert_eq!(out[0].sunrise_time, "2025-06-01T12:00:00.000Z");
        assert_eq!(out[0].sunset_time, "2025-06-01T12:00:00.000Z");
        assert_eq!(out[0].location_name, "Oslo");
    }

    #[test]
    fn optional_values_default_to_zero() {
        let resp: TmForecastResponse = serde_json::from_value(json!({
            "timelines": { "hourly": [{
                "time": "2025-06-01T10:00:00Z",
                "values": { "temperature": -3.5, "weatherCode": 5100, "windSpeed": 0 }
            }] }
        }))
        .unwrap();
        let w = &normalize(&resp, &ForecastRequest::new("x"), now(), utc()).unwrap()[0];

        assert_eq!(w.temp, -3);
        assert_eq!(w.condition, Condition::Snow);
        assert_eq!(w.wind_speed, 0);
        assert_eq!(w.pressure, 0);
        assert_eq!(w.uv_index, 0.0);
        assert_eq!(w.cloud_cover, 0.0);
    }

    #[test]
    fn null_code_and_wind_direction_fall_back() {
        let resp: TmForecastResponse = serde_json::from_value(json!({
            "timelines": { "hourly": [
                {
                    "time": "2025-06-01T10:00:00Z",
                    "values": {
                        "temperature": 12.0,
                        "weatherCode": null,
                        "windSpeed": 3.0,
                        "windDirection": null
                    }
                },
                {
                    "time": "2025-06-01T11:00:00Z",
                    "values": { "temperature": 13.0, "windSpeed": 3.0 }
                },
                hour(12, 4201)
            ] }
        }))
        .unwrap();
        let out = normalize(&resp, &ForecastRequest::new("x"), now(), utc()).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].condition, Condition::Clear);
        assert_eq!(out[0].wind_direction, 0.0);
        assert_eq!(out[1].condition, Condition::Clear);
        assert_eq!(out[1].wind_direction, 0.0);
        assert_eq!(out[2].condition, Condition::Storm);
    }

    #[test]
    fn invalid_hour_time_is_shape_error() {
        let mut h = hour(10, 1000);
        h["time"] = json!("yesterday");
        let err = normalize(&payload(vec![h]), &ForecastRequest::new("x"), now(), utc()).unwrap_err();
        assert!(matches!(err, FetchError::Shape(_)));
    }

    #[test]
    fn location_name_precedence() {
        assert_eq!(resolve_location_name(Some("Home"), Some("Paris"), "paris"), "Home");
        assert_eq!(resolve_location_name(None, Some("Paris"), "paris"), "Paris");
        assert_eq!(resolve_location_name(None, None, "paris"), "paris");
        assert_eq!(resolve_location_name(Some(""), None, "paris"), "paris");
    }

    #[test]
    fn coordinates_become_current_location() {
        assert_eq!(resolve_location_name(None, None, "28.61,77.20"), CURRENT_LOCATION);
        assert_eq!(resolve_location_name(None, Some("-33.9, 151"), "x"), CURRENT_LOCATION);
        assert_eq!(resolve_location_name(Some("Sydney"), None, "-33.9,151.2"), "Sydney");
    }

    #[test]
    fn coordinate_pattern() {
        for ok in ["1,2", "-1.5,2.25", "51.5074, -0.1278", "0,\t0", "10.0,-20"] {
            assert!(is_coordinate_pair(ok), "{ok}");
        }
        for bad in ["", "London", "1,", ",2", "1.,2", ".5,2", " 1,2", "1,2 ", "1,2,3", "a,b", "1;2"] {
            assert!(!is_coordinate_pair(bad), "{bad}");
        }
    }

    #[test]
    fn lat_lng_query_without_name_is_current_location() {
        let resp: TmForecastResponse = serde_json::from_value(json!({
            "timelines": { "hourly": [hour(10, 1000)] }
        }))
        .unwrap();
        let out = normalize(&resp, &ForecastRequest::new("40.7128,-74.0060"), now(), utc()).unwrap();
        assert_eq!(out[0].location_name, CURRENT_LOCATION);
    }
}
