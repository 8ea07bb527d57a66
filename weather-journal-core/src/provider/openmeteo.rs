use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::Endpoints,
    dates::DateRange,
    error::{Result, WeatherError},
    model::DailySeries,
};

use super::{ForecastPayload, GeoMatch, Geocoder, WeatherSource};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weathercode,windspeed_10m,pressure_msl";
const FORECAST_DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,weathercode,precipitation_sum";
const ARCHIVE_DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

/// Open-Meteo geocoding, forecast and archive services. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    endpoints: Endpoints,
    language: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(endpoints: Endpoints, language: String) -> Self {
        Self { endpoints, language, http: Client::new() }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(url, ?query, "requesting Open-Meteo {what}");

        let res = self.http.get(url).query(query).send().await.map_err(|e| {
            WeatherError::upstream(format!("Failed to send request to Open-Meteo ({what}): {e}"))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::upstream(format!("Failed to read Open-Meteo {what} response body: {e}"))
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<OmError>(&body)
                .map(|e| e.reason)
                .unwrap_or_else(|_| truncate_body(&body));
            return Err(WeatherError::upstream(format!(
                "Open-Meteo {what} request failed with status {status}: {detail}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::upstream(format!("Failed to parse Open-Meteo {what} JSON: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmError {
    reason: String,
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    #[serde(default)]
    results: Vec<GeoMatch>,
}

#[derive(Debug, Deserialize)]
struct OmArchiveResponse {
    daily: DailySeries,
}

#[async_trait]
impl Geocoder for OpenMeteoProvider {
    async fn search(&self, query: &str) -> Result<Option<GeoMatch>> {
        let parsed: OmSearchResponse = self
            .get_json(
                "geocoding",
                &self.endpoints.geocoding,
                &[
                    ("name", query.to_string()),
                    ("count", "1".to_string()),
                    ("language", self.language.clone()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        Ok(parsed.results.into_iter().next())
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoProvider {
    async fn forecast(&self, latitude: f64, longitude: f64, days: u8) -> Result<ForecastPayload> {
        self.get_json(
            "forecast",
            &self.endpoints.forecast,
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", FORECAST_DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", days.to_string()),
            ],
        )
        .await
    }

    async fn archive(
        &self,
        latitude: f64,
        longitude: f64,
        range: &DateRange,
    ) -> Result<DailySeries> {
        let parsed: OmArchiveResponse = self
            .get_json(
                "archive",
                &self.endpoints.archive,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("start_date", range.start().to_string()),
                    ("end_date", range.end().to_string()),
                    ("daily", ARCHIVE_DAILY_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                ],
            )
            .await?;

        Ok(parsed.daily)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::validate_range;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenMeteoProvider {
        let base = server.uri();
        OpenMeteoProvider::new(
            Endpoints {
                geocoding: format!("{base}/v1/search"),
                forecast: format!("{base}/v1/forecast"),
                archive: format!("{base}/v1/archive"),
            },
            "en".to_string(),
        )
    }

    #[tokio::test]
    async fn search_returns_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Berlin"))
            .and(query_param("count", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"latitude": 52.52437, "longitude": 13.41053, "name": "Berlin",
                     "country": "Germany", "admin1": "Land Berlin", "id": 2950159},
                    {"latitude": 39.79, "longitude": -89.64, "name": "Berlin",
                     "country": "United States"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = provider_for(&server).search("Berlin").await.unwrap().unwrap();
        assert_eq!(found.name, "Berlin");
        assert_eq!(found.admin1.as_deref(), Some("Land Berlin"));
        assert_eq!(found.latitude, 52.52437);
    }

    #[tokio::test]
    async fn search_without_results_is_none() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"generationtime_ms": 0.5})),
            )
            .mount(&server)
            .await;

        let found = provider_for(&server).search("Nowhere-at-all").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn forecast_requests_six_days() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/forecast"))
            .and(query_param("forecast_days", "6"))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": {
                    "temperature_2m": 21.4, "relative_humidity_2m": 40,
                    "apparent_temperature": 20.6, "precipitation": 0.0,
                    "weathercode": 2, "windspeed_10m": 11.5, "pressure_msl": 1013.4
                },
                "daily": {
                    "time": ["2024-06-01", "2024-06-02"],
                    "temperature_2m_max": [22.0, null],
                    "temperature_2m_min": [12.0, 13.0],
                    "weathercode": [2, null],
                    "precipitation_sum": [0.0, 4.2]
                }
            })))
            .mount(&server)
            .await;

        let payload = provider_for(&server).forecast(52.5, 13.4, 6).await.unwrap();
        assert_eq!(payload.current.weathercode, 2);
        assert_eq!(payload.daily.time.len(), 2);
        assert_eq!(payload.daily.precipitation_sum[1], Some(4.2));
        assert_eq!(payload.daily.temperature_2m_max[1], None);
        assert_eq!(payload.daily.weathercode[1], None);
    }

    #[tokio::test]
    async fn archive_sends_closed_interval() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/archive"))
            .and(query_param("start_date", "2023-01-01"))
            .and(query_param("end_date", "2023-01-02"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 52.5,
                "daily": {
                    "time": ["2023-01-01", "2023-01-02"],
                    "temperature_2m_max": [5.1, null],
                    "temperature_2m_min": [1.0, 0.4],
                    "precipitation_sum": [0.0, 2.2],
                    "weathercode": [3, 63]
                }
            })))
            .mount(&server)
            .await;

        let range = validate_range(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();

        let series = provider_for(&server).archive(52.5, 13.4, &range).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.temperature_2m_max, vec![Some(5.1), None]);
        assert_eq!(series.weathercode, vec![Some(3), Some(63)]);
    }

    #[tokio::test]
    async fn error_status_surfaces_reason() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": true,
                "reason": "Parameter 'start_date' is out of allowed range"
            })))
            .mount(&server)
            .await;

        let range = validate_range(
            NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(1900, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();

        let err = provider_for(&server).archive(0.0, 0.0, &range).await.unwrap_err();
        match err {
            WeatherError::Upstream(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("out of allowed range"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_shape_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server).forecast(0.0, 0.0, 6).await.unwrap_err();
        assert!(matches!(err, WeatherError::Upstream(msg) if msg.contains("parse")));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 203);
    }
}
