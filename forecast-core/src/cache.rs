use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::DetailedWeather;

pub const CACHE_FILE: &str = "forecast_cache.json";

/// Successful forecasts keyed by request, persisted as JSON so later runs
/// can reuse them until `ttl` elapses.
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    path: Option<PathBuf>,
    // Serializes read-modify-write of the file within this process.
    lock: Mutex<()>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    stored_at: DateTime<Utc>,
    forecast: Vec<DetailedWeather>,
}

type Entries = HashMap<String, Entry>;

impl ForecastCache {
    /// Cache backed by `path`. With no path, or a zero `ttl`, nothing is kept.
    pub fn new(ttl: Duration, path: Option<PathBuf>) -> Self {
        Self { ttl, path, lock: Mutex::new(()) }
    }

    pub fn in_dir(ttl: Duration, dir: &Path) -> Self {
        Self::new(ttl, Some(dir.join(CACHE_FILE)))
    }

    /// Cache file in the platform cache directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "forecast", "forecast-cli")
            .map(|dirs| dirs.cache_dir().join(CACHE_FILE))
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.path.is_some()
    }

    pub fn get(&self, key: &str) -> Option<Vec<DetailedWeather>> {
        self.get_at(key, Utc::now())
    }

    pub fn insert(&self, key: String, forecast: Vec<DetailedWeather>) {
        self.insert_at(key, forecast, Utc::now());
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<DetailedWeather>> {
        let path = self.path.as_deref().filter(|_| self.is_enabled())?;
        let _guard = self.lock.lock();

        let mut entries = load(path)
            .inspect_err(|e| tracing::warn!("ignoring forecast cache: {e:#}"))
            .ok()?;

        let entry = entries.get(key)?;
        if self.is_fresh(entry, now) {
            return Some(entry.forecast.clone());
        }

        entries.remove(key);
        if let Err(e) = store(path, &entries) {
            tracing::warn!("failed to prune forecast cache: {e:#}");
        }
        None
    }

    fn insert_at(&self, key: String, forecast: Vec<DetailedWeather>, now: DateTime<Utc>) {
        let Some(path) = self.path.as_deref().filter(|_| self.is_enabled()) else {
            return;
        };
        let _guard = self.lock.lock();

        let mut entries = load(path).unwrap_or_default();
        entries.retain(|_, e| self.is_fresh(e, now));
        entries.insert(key, Entry { stored_at: now, forecast });

        if let Err(e) = store(path, &entries) {
            tracing::warn!("failed to write forecast cache: {e:#}");
        }
    }

    fn is_fresh(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        // A stored_at in the future (clock moved back) counts as stale.
        (now - entry.stored_at).to_std().is_ok_and(|age| age < self.ttl)
    }
}

fn load(path: &Path) -> Result<Entries> {
    if !path.exists() {
        return Ok(Entries::new());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache file: {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse cache file: {}", path.display()))
}

fn store(path: &Path, entries: &Entries) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create cache directory: {}", parent.display())
        })?;
    }

    let json = serde_json::to_string(entries).context("Failed to serialize forecast cache")?;

    fs::write(path, json)
        .with_context(|| format!("Failed to write cache file: {}", path.display()))
}
