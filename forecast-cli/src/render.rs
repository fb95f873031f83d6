//! Plain-text rendering of a forecast timeline.

use std::fmt::Write;

use chrono::{DateTime, Local};
use forecast_core::{DetailedWeather, Tone, insights::visibility_rating};

pub const UNAVAILABLE: &str =
    "Weather Unavailable: we couldn't find weather data. Try searching for a major city.";

/// Header, one row per hour, then detail and tips for the first hour.
pub fn timeline(forecast: &[DetailedWeather]) -> String {
    let mut out = String::new();
    let Some(now) = forecast.first() else {
        return out;
    };

    let _ = writeln!(out, "{}", now.location_name);
    let _ = writeln!(
        out,
        "Sunrise {}   Sunset {}   Sun {:.0}% across the sky",
        clock(&now.sunrise_time),
        clock(&now.sunset_time),
        now.sun_position().progress * 100.0,
    );
    let _ = writeln!(out);

    for w in forecast {
        let _ = writeln!(
            out,
            "{:>6}  {:>4}°C  {:<6}  {:>3} km/h {:>3.0}°  {}",
            w.time_label,
            w.temp,
            w.condition,
            w.wind_speed,
            w.wind_direction,
            if w.is_day { "day" } else { "night" },
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Wind        {} km/h ({:.0}°)", now.wind_speed, now.wind_direction);
    let _ = writeln!(out, "Humidity    {}%", now.humidity);
    let _ = writeln!(out, "Pressure    {} hPa", now.pressure);
    let _ = writeln!(
        out,
        "Visibility  {} km ({})",
        now.visibility,
        visibility_rating(now.visibility).as_str()
    );
    let _ = writeln!(out, "UV index    {}", now.uv_index);
    let _ = writeln!(out, "Cloud cover {}%", now.cloud_cover);

    let _ = writeln!(out);
    let _ = writeln!(out, "Lifestyle Insights");
    for tip in now.lifestyle_tips() {
        let _ = writeln!(out, "  {} {:<17} {}", marker(tip.tone), tip.label, tip.value);
    }

    out
}

fn marker(tone: Tone) -> char {
    match tone {
        Tone::Good => '+',
        Tone::Warning => '!',
        Tone::Bad => '-',
    }
}

/// "6:05 AM" in local time, or "--:--".
fn clock(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Local).format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| "--:--".to_string())
}
