//! Core library for the `weather-journal` CLI.
//!
//! This crate defines:
//! - Location lookup and weather fetching over Open-Meteo
//! - Summaries of historical daily series
//! - The on-disk record collection and its exports
//! - Configuration handling
//!
//! It is used by `weather-journal-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod app;
pub mod condition;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod geo;
pub mod model;
pub mod provider;
pub mod store;
pub mod weather;

pub use app::WeatherApp;
pub use config::{Config, Endpoints};
pub use error::WeatherError;
pub use export::{Export, ExportFile, ExportFormat};
pub use model::{CurrentReport, CurrentWeatherView, DailySeries, ForecastDay, WeatherRecord};
pub use provider::{Geocoder, OpenMeteoProvider, WeatherSource};
pub use store::{LoadOutcome, RecordStore};
