// src/source.rs
//
// The upstream transaction API, one (region, year, quarter) cell per query.

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::consts::{API_BASE_URL, PRICE_CLASSIFICATION, Region, region_by_key};
use crate::core::net;
use crate::normalize::RawRecord;

/// Why one cell came back empty. Never fatal to a run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("API returned status {0:?}")]
    ApiStatus(String),
    #[error("API answered OK without a data array")]
    MissingData,
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

/// One query unit against the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellQuery {
    pub region: &'static Region,
    pub year: i32,
    pub quarter: u8,
    pub city: Option<String>,
}

impl CellQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut p = vec![
            ("year", self.year.to_string()),
            ("quarter", self.quarter.to_string()),
            ("area", self.region.code.to_string()),
            ("priceClassification", s!(PRICE_CLASSIFICATION)),
        ];
        if let Some(city) = &self.city {
            p.push(("city", city.clone()));
        }
        p
    }

    pub fn label(&self) -> String {
        format!("{} {}Q{}", self.region.key, self.year, self.quarter)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<Vec<RawRecord>>,
}

/// Map a response body onto the cell's records. Anything but an "OK"
/// status carrying a data array is a cell error.
pub fn decode_response(body: &str) -> Result<Vec<RawRecord>, SourceError> {
    let resp: ApiResponse = serde_json::from_str(body)?;
    match (resp.status.as_deref(), resp.data) {
        (Some("OK"), Some(data)) => Ok(data),
        (Some("OK"), None) => Err(SourceError::MissingData),
        (status, _) => Err(SourceError::ApiStatus(status.unwrap_or("Unknown").to_string())),
    }
}

/// Anything that can answer a cell query. The fetcher only sees this.
pub trait DataSource {
    fn fetch_cell(&self, query: &CellQuery) -> Result<Vec<RawRecord>, SourceError>;
}

/// Live client for the MLIT real-estate transaction endpoint.
pub struct MlitClient {
    client: Client,
    base_url: String,
}

impl MlitClient {
    pub fn new(api_key: &str) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, API_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, SourceError> {
        Ok(Self { client: net::build_client(api_key)?, base_url: s!(base_url) })
    }

    /// One small query (Tokyo, 2024 Q1). Ok even when it returns no rows.
    pub fn test_connection(&self) -> Result<usize, SourceError> {
        let Some(tokyo) = region_by_key("tokyo") else {
            return Err(SourceError::Transport(s!("tokyo missing from region table")));
        };
        let q = CellQuery { region: tokyo, year: 2024, quarter: 1, city: None };
        let rows = self.fetch_cell(&q)?;
        logf!("Source: connection OK ({} records)", rows.len());
        Ok(rows.len())
    }
}

impl DataSource for MlitClient {
    fn fetch_cell(&self, query: &CellQuery) -> Result<Vec<RawRecord>, SourceError> {
        let body = net::get_body(&self.client, &self.base_url, &query.params())?;
        decode_response(&body)
    }
}
