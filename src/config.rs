//! Configuration options for the inventory tracker

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::low_stock::LowStockPolicy;

/// Spreadsheet the tracker reads when nothing else is configured
pub const DEFAULT_SPREADSHEET_ID: &str = "1nSxUmaf0bmc97YR_51-L0uLqi1AC6meFbFFNedZJUeE";

/// Columns A through I hold the nine record fields
pub const DEFAULT_RANGE: &str = "Sheet1!A:I";

/// Configuration options for the inventory tracker
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// Base URL of the spreadsheet API
    pub sheets_url: String,

    /// The spreadsheet to sync with
    pub spreadsheet_id: String,

    /// Row range read on load and appended to on add
    pub range: String,

    /// The request timeout, enforced by the transport
    pub request_timeout: Option<Duration>,

    /// Key under which the API key is persisted
    pub credential_key: String,

    /// Quantity/threshold comparison for the low-stock view
    pub low_stock_policy: LowStockPolicy,

    /// Load the sample collection when the startup fetch fails
    pub seed_on_failure: bool,

    /// Append newly added records to the spreadsheet
    pub append_on_add: bool,

    /// How long informational notices stay up
    pub info_notice_duration: Duration,

    /// How long success notices stay up
    pub success_notice_duration: Duration,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            sheets_url: inventory_tracker_sheets::DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            range: DEFAULT_RANGE.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            credential_key: "googleSheetsApiKey".to_string(),
            low_stock_policy: LowStockPolicy::default(),
            seed_on_failure: true,
            append_on_add: true,
            info_notice_duration: Duration::from_secs(5),
            success_notice_duration: Duration::from_secs(3),
        }
    }
}

impl TrackerOptions {
    /// Defaults overlaid with `INVENTORY_SHEETS_URL`,
    /// `INVENTORY_SPREADSHEET_ID` and `INVENTORY_SHEET_RANGE` when set
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(url) = env_value("INVENTORY_SHEETS_URL") {
            options.sheets_url = url;
        }
        if let Some(id) = env_value("INVENTORY_SPREADSHEET_ID") {
            options.spreadsheet_id = id;
        }
        if let Some(range) = env_value("INVENTORY_SHEET_RANGE") {
            options.range = range;
        }
        options
    }

    /// Set the spreadsheet API base URL
    pub fn with_sheets_url(mut self, value: &str) -> Self {
        self.sheets_url = value.to_string();
        self
    }

    /// Set the spreadsheet id
    pub fn with_spreadsheet_id(mut self, value: &str) -> Self {
        self.spreadsheet_id = value.to_string();
        self
    }

    /// Set the row range
    pub fn with_range(mut self, value: &str) -> Self {
        self.range = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the credential key
    pub fn with_credential_key(mut self, value: &str) -> Self {
        self.credential_key = value.to_string();
        self
    }

    /// Set the low-stock comparison
    pub fn with_low_stock_policy(mut self, value: LowStockPolicy) -> Self {
        self.low_stock_policy = value;
        self
    }

    /// Set whether a failed startup fetch falls back to sample data
    pub fn with_seed_on_failure(mut self, value: bool) -> Self {
        self.seed_on_failure = value;
        self
    }

    /// Set whether adds are appended to the spreadsheet
    pub fn with_append_on_add(mut self, value: bool) -> Self {
        self.append_on_add = value;
        self
    }

    /// Reject options no request could be built from
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.sheets_url)?;
        if url.cannot_be_a_base() {
            return Err(Error::general(format!("not a base URL: {}", self.sheets_url)));
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(Error::general("spreadsheet id is empty"));
        }
        if self.range.trim().is_empty() {
            return Err(Error::general("range is empty"));
        }
        Ok(())
    }

    /// Link to the spreadsheet's editor, used in setup instructions
    pub fn spreadsheet_url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/edit",
            self.spreadsheet_id
        )
    }

    /// First row/column span of the range, e.g. `Sheet1!A:I` -> (`Sheet1`, `A`, `I`)
    pub(crate) fn range_parts(&self) -> (Option<&str>, &str, &str) {
        let (sheet, cells) = match self.range.split_once('!') {
            Some((sheet, cells)) => (Some(sheet), cells),
            None => (None, self.range.as_str()),
        };
        let (start, end) = cells.split_once(':').unwrap_or((cells, cells));
        (sheet, start, end)
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = TrackerOptions::default();
        assert_eq!(options.range, "Sheet1!A:I");
        assert_eq!(options.credential_key, "googleSheetsApiKey");
        assert_eq!(options.request_timeout, Some(Duration::from_secs(30)));
        assert!(options.seed_on_failure);
    }

    #[test]
    fn builder() {
        let options = TrackerOptions::default()
            .with_spreadsheet_id("abc")
            .with_range("Stock!B:J")
            .with_low_stock_policy(LowStockPolicy::AtOrBelow);
        assert_eq!(options.spreadsheet_id, "abc");
        assert_eq!(options.range_parts(), (Some("Stock"), "B", "J"));
        assert_eq!(options.low_stock_policy, LowStockPolicy::AtOrBelow);
        assert_eq!(
            options.spreadsheet_url(),
            "https://docs.google.com/spreadsheets/d/abc/edit"
        );
    }

    #[test]
    fn validation() {
        assert!(TrackerOptions::default().validate().is_ok());
        assert!(matches!(
            TrackerOptions::default().with_sheets_url("not a url").validate(),
            Err(Error::Url(_))
        ));
        assert!(TrackerOptions::default().with_spreadsheet_id(" ").validate().is_err());
    }

    #[test]
    fn range_without_sheet() {
        let options = TrackerOptions::default().with_range("A:I");
        assert_eq!(options.range_parts(), (None, "A", "I"));
    }
}
