//! Reading rows from Google Sheets.

pub mod auth;

pub use auth::{authorize, AuthError};

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::logs::Row;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("unable to build the request url for `{0}`")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("the sheets api responded with {status}: {message}")]
    Api { status: u16, message: String },
}

/// Something rows can be fetched from.
pub trait DataSource {
    /// Returns the rows of `range` (A1 notation) in the spreadsheet `id`,
    /// in the order they appear in the sheet.
    fn fetch_rows(&self, id: &str, range: &str) -> Result<Vec<Row>, SheetError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Row>,
}

/// A client for the Google Sheets v4 api.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl SheetsClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("the default url is valid"),
            access_token: access_token.into(),
        }
    }

    /// Uses another server than `sheets.googleapis.com`.
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, SheetError> {
        let base_url =
            Url::parse(base_url).map_err(|_| SheetError::InvalidUrl(base_url.to_string()))?;

        Ok(Self {
            base_url,
            ..Self::new(access_token)
        })
    }

    fn values_url(&self, id: &str, range: &str) -> Result<Url, SheetError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", id, "values", range]);

        Ok(url)
    }
}

impl DataSource for SheetsClient {
    fn fetch_rows(&self, id: &str, range: &str) -> Result<Vec<Row>, SheetError> {
        let url = self.values_url(id, range)?;
        info!("fetching `{}` from sheet `{}`", range, id);
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Api {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let rows = response.json::<ValueRange>()?.values;
        info!("fetched {} rows", rows.len());

        Ok(rows)
    }
}
