use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{Config, dates::DateRange, error::Result, model::DailySeries};

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Best geocoding match, as returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
}

/// Instantaneous fields of a current-conditions response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentSnapshot {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub weathercode: i32,
    pub windspeed_10m: f64,
    pub pressure_msl: f64,
}

/// Daily aggregates of a forecast response; index 0 is today.
///
/// Values the service has no data for arrive as `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ForecastDaily {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
    pub precipitation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPayload {
    pub current: CurrentSnapshot,
    pub daily: ForecastDaily,
}

/// Free-text location lookup.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Return the single best match, or `None` when nothing matched.
    async fn search(&self, query: &str) -> Result<Option<GeoMatch>>;
}

/// Current/forecast and archived daily weather for a coordinate pair.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions plus `days` days of daily forecast starting today.
    async fn forecast(&self, latitude: f64, longitude: f64, days: u8) -> Result<ForecastPayload>;

    /// Archived daily series for the closed interval.
    async fn archive(&self, latitude: f64, longitude: f64, range: &DateRange)
    -> Result<DailySeries>;
}

/// Construct the Open-Meteo provider from config.
pub fn provider_from_config(config: &Config) -> OpenMeteoProvider {
    OpenMeteoProvider::new(config.endpoints.clone(), config.language.clone())
}
