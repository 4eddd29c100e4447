//! Spreadsheet values API client
//!
//! A thin async client for the `spreadsheets/{id}/values` endpoints: read a
//! range, append rows, overwrite a range and clear a range. Cells travel as
//! rows of strings; interpreting them is left to the caller.

mod fetch;
mod types;

use std::time::Duration;

use log::debug;
use reqwest::{Client, Method};
use thiserror::Error;
use url::Url;

pub use fetch::FetchBuilder;
pub use types::*;

/// Default public endpoint of the spreadsheet API
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Error type
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("API error: {message} (Status: {status})")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl SheetsError {
    /// HTTP status of an API error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            SheetsError::ApiError { status, .. } => Some(*status),
            SheetsError::NetworkError(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SheetsError>;

/// Client bound to one spreadsheet
#[derive(Debug, Clone)]
pub struct SheetsClient {
    base_url: String,
    spreadsheet_id: String,
    http_client: Client,
    api_key: Option<String>,
    access_token: Option<String>,
    timeout: Option<Duration>,
}

impl SheetsClient {
    /// Create a new client for `spreadsheet_id` served from `base_url`
    pub fn new(base_url: &str, spreadsheet_id: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            http_client,
            api_key: None,
            access_token: None,
            timeout: None,
        }
    }

    /// Authenticate requests with an API key (`key` query parameter)
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Authenticate requests with an OAuth bearer token
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    /// Per-request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn values_url(&self, range: &str, action: Option<&str>) -> Result<Url> {
        if self.spreadsheet_id.is_empty() {
            return Err(SheetsError::InvalidParameters(
                "spreadsheet id is empty".to_string(),
            ));
        }
        if range.is_empty() {
            return Err(SheetsError::InvalidParameters("range is empty".to_string()));
        }

        let last = match action {
            Some(action) => format!("{}:{}", range, action),
            None => range.to_string(),
        };

        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::UrlParseError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("v4")
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&last);
        Ok(url)
    }

    fn request(&self, url: Url, method: Method) -> FetchBuilder<'_> {
        let mut fetch = FetchBuilder::new(&self.http_client, url, method).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            fetch = fetch.query("key", key);
        }
        if let Some(token) = &self.access_token {
            fetch = fetch.bearer_auth(token);
        }
        fetch
    }

    /// Read every cell in `range`
    pub async fn get_values(&self, range: &str) -> Result<ValueRange> {
        let url = self.values_url(range, None)?;
        let values = self.request(url, Method::GET).execute::<ValueRange>().await?;
        debug!("read {} rows from {}", values.values.len(), range);
        Ok(values)
    }

    /// Append rows after the last non-empty row of the table in `range`
    pub async fn append_values(
        &self,
        range: &str,
        rows: &[Vec<String>],
        option: ValueInputOption,
    ) -> Result<AppendValuesResponse> {
        let url = self.values_url(range, Some("append"))?;
        self.request(url, Method::POST)
            .query("valueInputOption", option.as_str())
            .json(&ValueRange::from_rows(rows))?
            .execute::<AppendValuesResponse>()
            .await
    }

    /// Overwrite the cells of `range` with `rows`
    pub async fn update_values(
        &self,
        range: &str,
        rows: &[Vec<String>],
        option: ValueInputOption,
    ) -> Result<UpdateValuesResponse> {
        let url = self.values_url(range, None)?;
        self.request(url, Method::PUT)
            .query("valueInputOption", option.as_str())
            .json(&ValueRange::from_rows(rows))?
            .execute::<UpdateValuesResponse>()
            .await
    }

    /// Clear the values of `range`, keeping formatting
    pub async fn clear_values(&self, range: &str) -> Result<ClearValuesResponse> {
        let url = self.values_url(range, Some("clear"))?;
        self.request(url, Method::POST)
            .execute::<ClearValuesResponse>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SheetsClient {
        SheetsClient::new("https://sheets.example.com/", "sheet-id", Client::new())
    }

    #[test]
    fn builds_values_url() {
        let url = client().values_url("Sheet1!A:I", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/sheet-id/values/Sheet1!A:I"
        );
    }

    #[test]
    fn builds_action_url() {
        let url = client().values_url("Sheet1!A:I", Some("append")).unwrap();
        assert!(url.path().ends_with("/values/Sheet1!A:I:append"));
    }

    #[test]
    fn rejects_empty_range() {
        assert!(matches!(
            client().values_url("", None),
            Err(SheetsError::InvalidParameters(_))
        ));
    }
}
