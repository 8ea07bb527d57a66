//! Plain-text views of reports and records.

use std::fmt::Write as _;
use weather_journal_core::{CurrentReport, WeatherRecord};

pub fn current_report(report: &CurrentReport) -> String {
    let cur = &report.current;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({:.4}, {:.4})", cur.location, cur.latitude, cur.longitude);
    let _ = writeln!(
        out,
        "  {}, {}°C (feels like {}°C)",
        cur.condition, cur.temperature, cur.feels_like
    );
    let _ = writeln!(
        out,
        "  Humidity {}%  Wind {} km/h  Pressure {} hPa  Precipitation {} mm",
        cur.humidity, cur.wind_speed, cur.pressure, cur.precipitation
    );

    out.push_str("\nNext 5 days:\n");
    for day in &report.forecast {
        let _ = writeln!(
            out,
            "  {}  {:<20} {:>4}°C / {:>4}°C  {} mm",
            day.date,
            day.condition,
            or_dash(day.max_temp),
            or_dash(day.min_temp),
            or_dash(day.precipitation)
        );
    }

    let links = [("Travel videos", cur.travel_video_url()), ("Map", cur.map_url())];
    if links.iter().any(|(_, url)| url.is_some()) {
        out.push('\n');
    }
    for (label, url) in links {
        if let Some(url) = url {
            let _ = writeln!(out, "{label}: {url}");
        }
    }

    out
}

pub fn record_summary(r: &WeatherRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", r.id, r.location);
    let _ = writeln!(out, "  {} to {}", r.start_date, r.end_date);
    let _ = writeln!(
        out,
        "  Avg max {:.1}°C  Avg min {:.1}°C  Total precipitation {:.1} mm",
        r.avg_max_temp, r.avg_min_temp, r.total_precipitation
    );
    out
}

pub fn record_list(records: &[WeatherRecord]) -> String {
    if records.is_empty() {
        return "No saved records yet.\n".to_string();
    }

    let mut out = String::new();
    for r in records {
        out.push_str(&record_summary(r));
        let _ = writeln!(out, "  Saved {}", r.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    out
}

pub fn record_detail(r: &WeatherRecord) -> String {
    let mut out = record_summary(r);
    let _ = writeln!(out, "  Coordinates {}, {}", r.latitude, r.longitude);
    let _ = writeln!(out, "  Saved {}", r.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));

    out.push_str("\n  Date        Max °C  Min °C  Precip mm\n");
    let d = &r.daily_data;
    for (i, date) in d.time.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}  {:>6}  {:>6}  {:>9}",
            date,
            cell(d.temperature_2m_max.get(i)),
            cell(d.temperature_2m_min.get(i)),
            cell(d.precipitation_sum.get(i)),
        );
    }
    out
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn cell(value: Option<&Option<f64>>) -> String {
    match value.copied().flatten() {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}
