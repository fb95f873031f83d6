//! Derived readings shown next to a forecast hour: lifestyle tips,
//! visibility rating and where the sun sits between sunrise and sunset.

use chrono::DateTime;
use serde::Serialize;

use crate::model::DetailedWeather;

/// How favourable a tip is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Warning,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipIcon {
    Car,
    Activity,
    Bug,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifestyleTip {
    pub label: &'static str,
    pub value: &'static str,
    pub icon: TipIcon,
    pub tone: Tone,
}

pub fn lifestyle_tips(w: &DetailedWeather) -> [LifestyleTip; 3] {
    let wet = w.condition.is_wet();
    let high_uv = w.uv_index > 7.0;
    let hot = w.temp > 30;
    let muggy = w.humidity > 70 && w.temp > 20;

    [
        LifestyleTip {
            label: "Car Washing",
            value: if wet { "Not Suitable" } else { "Suitable" },
            icon: TipIcon::Car,
            tone: if wet { Tone::Bad } else { Tone::Good },
        },
        LifestyleTip {
            label: "Outdoor Exercise",
            value: if high_uv {
                "Avoid (High UV)"
            } else if hot {
                "Heat Warning"
            } else {
                "Great conditions"
            },
            icon: TipIcon::Activity,
            tone: if high_uv || hot { Tone::Warning } else { Tone::Good },
        },
        LifestyleTip {
            label: "Mosquitoes",
            value: if muggy { "High Activity" } else { "Low Activity" },
            icon: TipIcon::Bug,
            tone: if muggy { Tone::Bad } else { Tone::Good },
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Good,
    Poor,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Good => "Good",
            Visibility::Poor => "Poor",
        }
    }
}

/// More than 9 km is good.
pub fn visibility_rating(km: i64) -> Visibility {
    if km > 9 { Visibility::Good } else { Visibility::Poor }
}

/// Width of the sun arc.
pub const ARC_WIDTH: f64 = 200.0;
/// Horizon line, measured from the top.
pub const ARC_BASE_Y: f64 = 80.0;
/// Height of the arc above the horizon.
pub const ARC_AMPLITUDE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunPosition {
    /// 0 at sunrise, 1 at sunset.
    pub progress: f64,
    pub x: f64,
    pub y: f64,
}

/// Position of the sun on the arc at `now`. Timestamps that fail to parse
/// count as the epoch, so a broken pair degrades to progress 0.
pub fn sun_position(sunrise: &str, sunset: &str, now: &str) -> SunPosition {
    let millis = |s: &str| {
        DateTime::parse_from_rfc3339(s)
            .map(|t| t.timestamp_millis())
            .unwrap_or(0)
    };
    let (start, end, at) = (millis(sunrise), millis(sunset), millis(now));

    let raw = if end > start { (at - start) as f64 / (end - start) as f64 } else { 0.0 };
    let progress = raw.clamp(0.0, 1.0);

    SunPosition {
        progress,
        x: progress * ARC_WIDTH,
        y: ARC_BASE_Y - (progress * std::f64::consts::PI).sin() * ARC_AMPLITUDE,
    }
}

impl DetailedWeather {
    pub fn lifestyle_tips(&self) -> [LifestyleTip; 3] {
        lifestyle_tips(self)
    }

    pub fn sun_position(&self) -> SunPosition {
        sun_position(&self.sunrise_time, &self.sunset_time, &self.raw_time)
    }
}
