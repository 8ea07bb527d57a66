use reqwest::Url;

use crate::{
    condition,
    dates::DateRange,
    error::{Result, WeatherError},
    model::{CurrentReport, CurrentWeatherView, DailySeries, ForecastDay, ResolvedLocation},
    provider::{ForecastPayload, WeatherSource},
};

/// Days shown in the forecast, today excluded.
pub const FORECAST_DAYS: usize = 5;

/// Fetch current conditions and the next five days for a resolved location.
pub async fn fetch_current(
    source: &dyn WeatherSource,
    location: &ResolvedLocation,
) -> Result<CurrentReport> {
    let payload = source
        .forecast(location.latitude, location.longitude, FORECAST_DAYS as u8 + 1)
        .await?;

    build_report(location, &payload)
}

/// Fetch the archived daily series backing a saved record.
pub async fn fetch_historical(
    source: &dyn WeatherSource,
    location: &ResolvedLocation,
    range: &DateRange,
) -> Result<DailySeries> {
    let series = source.archive(location.latitude, location.longitude, range).await?;

    let n = series.len();
    if series.temperature_2m_max.len() != n
        || series.temperature_2m_min.len() != n
        || series.precipitation_sum.len() != n
    {
        return Err(WeatherError::upstream("Archive response has mismatched daily series"));
    }

    Ok(series)
}

fn build_report(location: &ResolvedLocation, payload: &ForecastPayload) -> Result<CurrentReport> {
    let cur = &payload.current;
    let current = CurrentWeatherView {
        location: location.display_name.clone(),
        latitude: location.latitude,
        longitude: location.longitude,
        temperature: cur.temperature_2m.round() as i64,
        feels_like: cur.apparent_temperature.round() as i64,
        humidity: cur.relative_humidity_2m,
        wind_speed: cur.windspeed_10m.round() as i64,
        pressure: cur.pressure_msl.round() as i64,
        precipitation: cur.precipitation,
        condition: condition::describe(cur.weathercode).to_string(),
    };

    let daily = &payload.daily;
    // Day 0 is today; the forecast starts tomorrow.
    let forecast = (1..=FORECAST_DAYS)
        .map(|i| {
            let code = (*daily.weathercode.get(i)?).map_or("Unknown", condition::describe);
            Some(ForecastDay {
                date: *daily.time.get(i)?,
                max_temp: daily.temperature_2m_max.get(i)?.map(|t| t.round() as i64),
                min_temp: daily.temperature_2m_min.get(i)?.map(|t| t.round() as i64),
                condition: code.to_string(),
                precipitation: *daily.precipitation_sum.get(i)?,
            })
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            WeatherError::upstream(format!(
                "Forecast response has fewer than {} days",
                FORECAST_DAYS + 1
            ))
        })?;

    Ok(CurrentReport { current, forecast })
}

impl CurrentWeatherView {
    /// Video search for travel footage of this place.
    pub fn travel_video_url(&self) -> Option<Url> {
        let query = format!("{} weather travel", self.location);
        Url::parse_with_params("https://www.youtube.com/results", &[("search_query", query)]).ok()
    }

    /// Map search centred on the coordinates.
    pub fn map_url(&self) -> Option<Url> {
        let query = format!("{},{}", self.latitude, self.longitude);
        Url::parse_with_params(
            "https://www.google.com/maps/search/",
            &[("api", "1".to_string()), ("query", query)],
        )
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CurrentSnapshot, ForecastDaily};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct FakeSource {
        payload: ForecastPayload,
        series: DailySeries,
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn forecast(&self, _lat: f64, _lon: f64, days: u8) -> Result<ForecastPayload> {
            assert_eq!(days, 6);
            Ok(self.payload.clone())
        }

        async fn archive(&self, _lat: f64, _lon: f64, _range: &DateRange) -> Result<DailySeries> {
            Ok(self.series.clone())
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn payload(days: usize) -> ForecastPayload {
        ForecastPayload {
            current: CurrentSnapshot {
                temperature_2m: 21.5,
                relative_humidity_2m: 48.0,
                apparent_temperature: 20.4,
                precipitation: 0.2,
                weathercode: 61,
                windspeed_10m: 12.6,
                pressure_msl: 1012.5,
            },
            daily: ForecastDaily {
                time: (1..=days as u32).map(date).collect(),
                temperature_2m_max: (0..days).map(|i| Some(20.0 + i as f64 + 0.4)).collect(),
                temperature_2m_min: (0..days).map(|i| Some(10.0 + i as f64 + 0.6)).collect(),
                weathercode: (0..days).map(|i| Some(if i == 3 { 9999 } else { 0 })).collect(),
                precipitation_sum: (0..days).map(|i| Some(i as f64 * 0.5)).collect(),
            },
        }
    }

    fn berlin() -> ResolvedLocation {
        ResolvedLocation {
            latitude: 52.52,
            longitude: 13.41,
            display_name: "Berlin, Land Berlin, Germany".into(),
        }
    }

    #[tokio::test]
    async fn current_values_are_rounded() {
        let source = FakeSource { payload: payload(6), series: DailySeries::default() };
        let report = fetch_current(&source, &berlin()).await.unwrap();

        let cur = &report.current;
        assert_eq!(cur.temperature, 22);
        assert_eq!(cur.feels_like, 20);
        assert_eq!(cur.wind_speed, 13);
        assert_eq!(cur.pressure, 1013);
        assert_eq!(cur.humidity, 48.0);
        assert_eq!(cur.precipitation, 0.2);
        assert_eq!(cur.condition, "Light rain");
        assert_eq!(cur.location, "Berlin, Land Berlin, Germany");
    }

    #[tokio::test]
    async fn forecast_skips_today() {
        let source = FakeSource { payload: payload(6), series: DailySeries::default() };
        let report = fetch_current(&source, &berlin()).await.unwrap();

        assert_eq!(report.forecast.len(), FORECAST_DAYS);
        assert_eq!(report.forecast[0].date, date(2));
        assert_eq!(report.forecast[0].max_temp, Some(21));
        assert_eq!(report.forecast[0].min_temp, Some(12));
        assert_eq!(report.forecast[2].condition, "Unknown");
        assert_eq!(report.forecast[4].date, date(6));
        assert_eq!(report.forecast[4].precipitation, Some(2.5));
    }

    #[tokio::test]
    async fn null_forecast_values_do_not_fail_the_report() {
        let mut payload = payload(6);
        payload.daily.temperature_2m_max[2] = None;
        payload.daily.weathercode[2] = None;
        payload.daily.precipitation_sum[5] = None;
        let source = FakeSource { payload, series: DailySeries::default() };

        let report = fetch_current(&source, &berlin()).await.unwrap();
        assert_eq!(report.forecast.len(), FORECAST_DAYS);
        assert_eq!(report.forecast[1].max_temp, None);
        assert_eq!(report.forecast[1].min_temp, Some(13));
        assert_eq!(report.forecast[1].condition, "Unknown");
        assert_eq!(report.forecast[4].precipitation, None);
    }

    #[tokio::test]
    async fn short_forecast_is_upstream_error() {
        let source = FakeSource { payload: payload(4), series: DailySeries::default() };
        let err = fetch_current(&source, &berlin()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Upstream(_)));
    }

    #[tokio::test]
    async fn mismatched_archive_is_upstream_error() {
        let series = DailySeries {
            time: vec![date(1), date(2)],
            temperature_2m_max: vec![Some(1.0)],
            temperature_2m_min: vec![Some(1.0), Some(2.0)],
            precipitation_sum: vec![Some(0.0), Some(0.0)],
            weathercode: Vec::new(),
        };
        let source = FakeSource { payload: payload(6), series };
        let range = crate::dates::validate_range(date(1), date(2), date(30)).unwrap();

        let err = fetch_historical(&source, &berlin(), &range).await.unwrap_err();
        assert!(matches!(err, WeatherError::Upstream(_)));
    }

    #[test]
    fn companion_links_encode_location() {
        let view = CurrentWeatherView {
            location: "New York, New York, United States".into(),
            latitude: 40.71,
            longitude: -74.01,
            temperature: 0,
            feels_like: 0,
            humidity: 0.0,
            wind_speed: 0,
            pressure: 0,
            precipitation: 0.0,
            condition: "Clear sky".into(),
        };

        let video = view.travel_video_url().unwrap();
        assert_eq!(video.host_str(), Some("www.youtube.com"));
        assert!(video.as_str().contains("search_query=New+York%2C+New+York"));

        let map = view.map_url().unwrap();
        assert!(map.as_str().ends_with("api=1&query=40.71%2C-74.01"));
    }
}
