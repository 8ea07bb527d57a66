use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A geocoded location: first match of a free-text query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// "Name, Region, Country", region omitted when unknown.
    pub display_name: String,
}

/// Parallel per-day arrays as returned by the archive service.
///
/// Missing upstream values stay `None` so the stored series matches what was fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weathercode: Vec<Option<i32>>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Derived scalars of a daily series, each rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub avg_max_temp: f64,
    pub avg_min_temp: f64,
    pub total_precipitation: f64,
}

/// One saved historical-weather summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub id: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub avg_max_temp: f64,
    pub avg_min_temp: f64,
    pub total_precipitation: f64,
    pub daily_data: DailySeries,
    pub saved_at: DateTime<Utc>,
}

/// Current conditions as shown to the user. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeatherView {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: f64,
    pub wind_speed: i64,
    pub pressure: i64,
    pub precipitation: f64,
    pub condition: String,
}

/// One forecast day. `None` where the service reported no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp: Option<i64>,
    pub min_temp: Option<i64>,
    pub condition: String,
    pub precipitation: Option<f64>,
}

/// Current snapshot plus the next five days (today excluded).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentReport {
    pub current: CurrentWeatherView,
    pub forecast: Vec<ForecastDay>,
}
