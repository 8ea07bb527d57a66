use chrono::Utc;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    dates::DateRange,
    error::{Result, WeatherError},
    model::{DailySeries, ResolvedLocation, Summary, WeatherRecord},
};

/// What was found when the records file was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Missing,
    /// Unreadable or unparsable; the collection starts empty.
    Corrupt(String),
}

/// Everything a saved record holds besides its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub location: ResolvedLocation,
    pub range: DateRange,
    pub summary: Summary,
    pub daily: DailySeries,
}

/// Saved records, most recently saved first, mirrored to a JSON file.
///
/// Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<WeatherRecord>,
}

impl RecordStore {
    /// Read the collection from `path`. Never fails: a missing or corrupt file
    /// yields an empty collection, reported through the outcome.
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadOutcome) {
        let path = path.into();
        let (mut records, outcome) = read_records(&path);
        sort_recent_first(&mut records);

        if let LoadOutcome::Corrupt(reason) = &outcome {
            warn!("Ignoring unreadable records file {}: {}", path.display(), reason);
        }

        (Self { path, records }, outcome)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, `saved_at` descending.
    pub fn load_all(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&WeatherRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn create(&mut self, draft: RecordDraft) -> Result<WeatherRecord> {
        let saved_at = Utc::now();
        let record = WeatherRecord {
            id: new_record_id(saved_at.timestamp_millis()),
            location: draft.location.display_name,
            latitude: draft.location.latitude,
            longitude: draft.location.longitude,
            start_date: draft.range.start(),
            end_date: draft.range.end(),
            avg_max_temp: draft.summary.avg_max_temp,
            avg_min_temp: draft.summary.avg_min_temp,
            total_precipitation: draft.summary.total_precipitation,
            daily_data: draft.daily,
            saved_at,
        };

        // Newest timestamp, so prepending keeps the order.
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.push(record.clone());
        records.extend(self.records.iter().cloned());
        self.commit(records)?;

        info!("Saved record {} for {}", record.id, record.location);
        Ok(record)
    }

    /// Replace every mutable field of record `id` and stamp a new `saved_at`.
    pub fn update(&mut self, id: &str, draft: RecordDraft) -> Result<WeatherRecord> {
        let mut records = self.records.clone();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| WeatherError::not_found(format!("No saved record with id '{id}'")))?;

        record.location = draft.location.display_name;
        record.latitude = draft.location.latitude;
        record.longitude = draft.location.longitude;
        record.start_date = draft.range.start();
        record.end_date = draft.range.end();
        record.avg_max_temp = draft.summary.avg_max_temp;
        record.avg_min_temp = draft.summary.avg_min_temp;
        record.total_precipitation = draft.summary.total_precipitation;
        record.daily_data = draft.daily;
        record.saved_at = Utc::now();
        let updated = record.clone();

        sort_recent_first(&mut records);
        self.commit(records)?;

        info!("Updated record {}", updated.id);
        Ok(updated)
    }

    /// Remove record `id`. Returns whether anything was removed; absent ids are not an error.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let records: Vec<_> = self.records.iter().filter(|r| r.id != id).cloned().collect();
        let removed = records.len() != self.records.len();

        self.commit(records)?;

        if removed {
            info!("Deleted record {id}");
        }
        Ok(removed)
    }

    /// Write `records` to disk, then make them the in-memory collection.
    /// On a failed write the collection is left as it was.
    fn commit(&mut self, records: Vec<WeatherRecord>) -> Result<()> {
        self.write(&records)?;
        self.records = records;
        Ok(())
    }

    fn write(&self, records: &[WeatherRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Storage(format!(
                    "Failed to create records directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string(records)
            .map_err(|e| WeatherError::Storage(format!("Failed to serialize records: {e}")))?;

        fs::write(&self.path, json).map_err(|e| {
            WeatherError::Storage(format!(
                "Failed to write records file {}: {e}",
                self.path.display()
            ))
        })
    }
}

fn read_records(path: &Path) -> (Vec<WeatherRecord>, LoadOutcome) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (Vec::new(), LoadOutcome::Missing);
        }
        Err(e) => return (Vec::new(), LoadOutcome::Corrupt(e.to_string())),
    };

    match serde_json::from_str::<Vec<WeatherRecord>>(&contents) {
        Ok(records) => {
            let n = records.len();
            (records, LoadOutcome::Loaded(n))
        }
        Err(e) => (Vec::new(), LoadOutcome::Corrupt(e.to_string())),
    }
}

fn sort_recent_first(records: &mut [WeatherRecord]) {
    records.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
}

/// `weather_<millis>_<9 random chars>`
fn new_record_id(millis: i64) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("weather_{millis}_{}", &suffix[..9])
}
