//! Application state and the actions a front end drives.
//!
//! `WeatherApp` owns the record collection and the two upstream services.
//! Actions take `&mut self` for mutations, so overlapping edits of the same
//! collection cannot happen within one process.

use chrono::Utc;

use crate::{
    aggregate,
    dates::{self, DateRange},
    error::Result,
    export::{self, Export, ExportFormat},
    geo,
    model::{CurrentReport, WeatherRecord},
    provider::{Geocoder, WeatherSource},
    store::{RecordDraft, RecordStore},
    weather,
};

pub struct WeatherApp {
    geocoder: Box<dyn Geocoder>,
    source: Box<dyn WeatherSource>,
    store: RecordStore,
}

impl WeatherApp {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        source: Box<dyn WeatherSource>,
        store: RecordStore,
    ) -> Self {
        Self { geocoder, source, store }
    }

    /// Current conditions and five-day forecast for free-text `location`.
    pub async fn current_weather(&self, location: &str) -> Result<CurrentReport> {
        let resolved = geo::resolve(self.geocoder.as_ref(), location).await?;
        weather::fetch_current(self.source.as_ref(), &resolved).await
    }

    /// Summarize `location` over `start..=end` and save it as a new record.
    pub async fn save_range(
        &mut self,
        location: &str,
        start: &str,
        end: &str,
    ) -> Result<WeatherRecord> {
        let range = dates::parse_range(start, end)?;
        let draft = self.build_draft(location, range).await?;
        self.store.create(draft)
    }

    /// Re-resolve `location`, refetch the range and overwrite record `id`.
    pub async fn edit_record(
        &mut self,
        id: &str,
        location: &str,
        start: &str,
        end: &str,
    ) -> Result<WeatherRecord> {
        let range = dates::parse_range(start, end)?;
        let draft = self.build_draft(location, range).await?;
        self.store.update(id, draft)
    }

    pub fn delete_record(&mut self, id: &str) -> Result<bool> {
        self.store.delete(id)
    }

    pub fn records(&self) -> &[WeatherRecord] {
        self.store.load_all()
    }

    pub fn record(&self, id: &str) -> Option<&WeatherRecord> {
        self.store.get(id)
    }

    pub fn export(&self, format: ExportFormat) -> Export {
        export::export(self.store.load_all(), format, Utc::now())
    }

    async fn build_draft(&self, location: &str, range: DateRange) -> Result<RecordDraft> {
        let resolved = geo::resolve(self.geocoder.as_ref(), location).await?;
        let daily = weather::fetch_historical(self.source.as_ref(), &resolved, &range).await?;
        let summary = aggregate::summarize(&daily)?;

        Ok(RecordDraft { location: resolved, range, summary, daily })
    }
}
