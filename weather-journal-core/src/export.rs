use chrono::{DateTime, Local, Utc};
use std::{convert::TryFrom, fmt::Write as _, str::FromStr};

use crate::model::WeatherRecord;

/// Shown instead of a file when there is nothing to export.
pub const EMPTY_NOTICE: &str = "No data to export";

const CSV_HEADER: &str = "ID,Location,Latitude,Longitude,Start Date,End Date,Avg Max Temp (°C),Avg Min Temp (°C),Total Precipitation (mm),Saved At";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub const fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Json, ExportFormat::Csv, ExportFormat::Xml, ExportFormat::Markdown]
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xml => "application/xml",
            ExportFormat::Markdown => "text/markdown",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Json => "weather_data.json",
            ExportFormat::Csv => "weather_data.csv",
            ExportFormat::Xml => "weather_data.xml",
            ExportFormat::Markdown => "weather_data.md",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(anyhow::anyhow!(
                "Unknown export format '{value}'. Supported formats: json, csv, xml, markdown."
            )),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Rendered export, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub content: String,
    pub mime_type: &'static str,
    pub filename: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    File(ExportFile),
    /// Nothing to export; carries the notice for the user.
    Empty(&'static str),
}

/// Render `records` in `format`. `now` stamps the markdown header.
///
/// CSV and XML fields are written verbatim: quotes, commas and markup inside
/// a location are not escaped.
pub fn export(records: &[WeatherRecord], format: ExportFormat, now: DateTime<Utc>) -> Export {
    if records.is_empty() {
        return Export::Empty(EMPTY_NOTICE);
    }

    let content = match format {
        ExportFormat::Json => to_json(records),
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Xml => to_xml(records),
        ExportFormat::Markdown => to_markdown(records, now),
    };

    Export::File(ExportFile {
        content,
        mime_type: format.mime_type(),
        filename: format.filename(),
    })
}

fn to_json(records: &[WeatherRecord]) -> String {
    // Plain data with string keys; serialization cannot fail.
    serde_json::to_string_pretty(records).unwrap_or_default()
}

fn to_csv(records: &[WeatherRecord]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in records {
        let _ = writeln!(
            out,
            "\"{}\",\"{}\",{},{},{},{},{:.1},{:.1},{:.1},\"{}\"",
            r.id,
            r.location,
            r.latitude,
            r.longitude,
            r.start_date,
            r.end_date,
            r.avg_max_temp,
            r.avg_min_temp,
            r.total_precipitation,
            saved_at(r),
        );
    }
    out
}

fn to_xml(records: &[WeatherRecord]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<weatherRecords>\n");
    for r in records {
        out.push_str("  <record>\n");
        let fields = [
            ("id", r.id.clone()),
            ("location", r.location.clone()),
            ("latitude", r.latitude.to_string()),
            ("longitude", r.longitude.to_string()),
            ("startDate", r.start_date.to_string()),
            ("endDate", r.end_date.to_string()),
            ("avgMaxTemp", format!("{:.1}", r.avg_max_temp)),
            ("avgMinTemp", format!("{:.1}", r.avg_min_temp)),
            ("totalPrecipitation", format!("{:.1}", r.total_precipitation)),
            ("savedAt", saved_at(r)),
        ];
        for (tag, value) in fields {
            let _ = writeln!(out, "    <{tag}>{value}</{tag}>");
        }
        out.push_str("  </record>\n");
    }
    out.push_str("</weatherRecords>");
    out
}

fn to_markdown(records: &[WeatherRecord], now: DateTime<Utc>) -> String {
    let mut out = String::from("# Weather Data Export\n\n");
    let _ = write!(
        out,
        "**Total Records:** {}\n\n**Exported:** {}\n\n---\n\n",
        records.len(),
        local_time(now)
    );

    for r in records {
        let _ = write!(
            out,
            "## {}\n\n\
             - **Date Range:** {} to {}\n\
             - **Coordinates:** {}°N, {}°E\n\
             - **Average Max Temperature:** {:.1}°C\n\
             - **Average Min Temperature:** {:.1}°C\n\
             - **Total Precipitation:** {:.1}mm\n\
             - **Saved:** {}\n\n---\n\n",
            r.location,
            r.start_date,
            r.end_date,
            r.latitude,
            r.longitude,
            r.avg_max_temp,
            r.avg_min_temp,
            r.total_precipitation,
            local_time(r.saved_at),
        );
    }
    out
}

fn saved_at(r: &WeatherRecord) -> String {
    r.saved_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
