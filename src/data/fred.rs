//! FRED API integration: series metadata and observations.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ProviderConfig;
use crate::data::SeriesProvider;
use crate::domain::{Observation, Series, SeriesId, SeriesMetadata};
use crate::error::AppError;

const SERIES_PATH: &str = "/fred/series";
const OBSERVATIONS_PATH: &str = "/fred/series/observations";

/// FRED's maximum page size for the observations endpoint.
const OBS_LIMIT: usize = 100_000;

pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FredClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, AppError> {
        let api_key = config.require_api_key()?.to_string();
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn fetch_metadata(&self, id: &SeriesId) -> Result<SeriesMetadata, AppError> {
        let body: SeriesResponse = self.get_json(SERIES_PATH, &[("series_id", id.as_str().to_string())])?;
        metadata_from_response(body, id)
    }

    /// Fetch every observation of the series in ascending date order.
    ///
    /// Pages through the endpoint until `count` observations have been read.
    pub fn fetch_observations(&self, id: &SeriesId) -> Result<Vec<Observation>, AppError> {
        let mut out = Vec::new();
        let mut offset = 0usize;

        loop {
            let page: ObservationsResponse = self.get_json(
                OBSERVATIONS_PATH,
                &[
                    ("series_id", id.as_str().to_string()),
                    ("sort_order", "asc".to_string()),
                    ("limit", OBS_LIMIT.to_string()),
                    ("offset", offset.to_string()),
                ],
            )?;

            let page_len = page.observations.len();
            out.extend(parse_observations(page.observations)?);
            offset += page_len;

            if page_len == 0 || offset >= page.count {
                break;
            }
            tracing::debug!(series = %id, offset, total = page.count, "fetching next observation page");
        }

        Ok(out)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str()), ("file_type", "json")])
            .send()
            .map_err(|e| AppError::provider(format!("FRED request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AppError::provider(match provider_error_message(&body) {
                Some(msg) => format!("FRED request failed with status {status}: {msg}"),
                None => format!("FRED request failed with status {status}."),
            }));
        }

        resp.json()
            .map_err(|e| AppError::provider(format!("Failed to parse FRED response: {e}")))
    }
}

impl SeriesProvider for FredClient {
    fn fetch_series(&self, id: &SeriesId) -> Result<Series, AppError> {
        let metadata = self.fetch_metadata(id)?;
        let observations = self.fetch_observations(id)?;
        tracing::info!(
            series = %id,
            title = %metadata.title,
            observations = observations.len(),
            "fetched series from FRED"
        );
        Ok(Series { metadata, observations })
    }
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    seriess: Vec<SeriesRecord>,
}

#[derive(Debug, Deserialize)]
struct SeriesRecord {
    id: String,
    title: String,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    units: Option<String>,
    #[serde(default)]
    seasonal_adjustment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    count: usize,
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: String,
}

fn metadata_from_response(body: SeriesResponse, id: &SeriesId) -> Result<SeriesMetadata, AppError> {
    let record = body
        .seriess
        .into_iter()
        .next()
        .ok_or_else(|| AppError::provider(format!("FRED returned no metadata for series {id}.")))?;

    if record.title.trim().is_empty() {
        return Err(AppError::provider(format!("FRED metadata for series {id} has no title.")));
    }

    Ok(SeriesMetadata {
        id: record.id,
        title: record.title,
        frequency: record.frequency,
        units: record.units,
        seasonal_adjustment: record.seasonal_adjustment,
    })
}

fn parse_observations(raw: Vec<RawObservation>) -> Result<Vec<Observation>, AppError> {
    let mut out = Vec::with_capacity(raw.len());
    for obs in raw {
        let value = match parse_value(&obs.value) {
            Some(v) => v,
            None => continue,
        };
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| AppError::provider(format!("Invalid FRED date '{}': {e}", obs.date)))?;
        out.push(Observation::new(date, value));
    }
    Ok(out)
}

/// FRED marks missing values with `"."`.
pub fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn provider_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error_message.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn metadata_decodes_first_record() {
        let body: SeriesResponse = serde_json::from_str(
            r#"{"realtime_start":"2024-01-01","seriess":[{
                "id":"CPIAUCSL",
                "title":"Consumer Price Index for All Urban Consumers: All Items in U.S. City Average",
                "frequency":"Monthly",
                "units":"Index 1982-1984=100",
                "seasonal_adjustment":"Seasonally Adjusted",
                "popularity":95
            }]}"#,
        )
        .unwrap();
        let id = SeriesId::parse("CPIAUCSL").unwrap();
        let meta = metadata_from_response(body, &id).unwrap();
        assert_eq!(meta.id, "CPIAUCSL");
        assert!(meta.title.starts_with("Consumer Price Index"));
        assert_eq!(meta.frequency.as_deref(), Some("Monthly"));
    }

    #[test]
    fn empty_metadata_is_a_provider_error() {
        let body: SeriesResponse = serde_json::from_str(r#"{"seriess":[]}"#).unwrap();
        let id = SeriesId::parse("NOPE").unwrap();
        let err = metadata_from_response(body, &id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
    }

    #[test]
    fn observations_skip_missing_values() {
        let body: ObservationsResponse = serde_json::from_str(
            r#"{"count":3,"offset":0,"limit":100000,"observations":[
                {"realtime_start":"x","realtime_end":"x","date":"2020-01-01","value":"1.5"},
                {"realtime_start":"x","realtime_end":"x","date":"2020-02-01","value":"."},
                {"realtime_start":"x","realtime_end":"x","date":"2020-03-01","value":"2.25"}
            ]}"#,
        )
        .unwrap();
        let obs = parse_observations(body.observations).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(obs[1].value, 2.25);
    }

    #[test]
    fn malformed_date_is_a_provider_error() {
        let raw = vec![RawObservation {
            date: "01/02/2020".to_string(),
            value: "1.0".to_string(),
        }];
        assert_eq!(parse_observations(raw).unwrap_err().kind(), ErrorKind::Provider);
    }

    #[test]
    fn parse_value_rejects_non_numeric() {
        assert_eq!(parse_value(" 3.5 "), Some(3.5));
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("n/a"), None);
    }

    #[test]
    fn error_body_message_is_extracted() {
        let body = r#"{"error_code":400,"error_message":"Bad Request.  The series does not exist."}"#;
        assert_eq!(
            provider_error_message(body).as_deref(),
            Some("Bad Request.  The series does not exist.")
        );
        assert_eq!(provider_error_message("<html>oops</html>"), None);
    }
}
