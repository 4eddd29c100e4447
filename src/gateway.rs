//! Remote sync against the spreadsheet
//!
//! [`SyncGateway`] is the seam the session talks to; [`SheetsGateway`] is the
//! implementation backed by the spreadsheet values API. Transport failures
//! are folded into the [`SyncError`] kinds here so callers never see HTTP
//! details.

use std::sync::Arc;

use async_trait::async_trait;
use inventory_tracker_sheets::{SheetsClient, SheetsError, ValueInputOption};
use log::{debug, info, warn};
use reqwest::Client;

use crate::config::TrackerOptions;
use crate::credentials::{configured_credential, CredentialStore};
use crate::error::SyncError;
use crate::item::{ItemId, ItemRecord, SHEET_HEADER};

/// Remote data source for the store
#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Read every record. Ids are the 1-based positions of the surviving rows.
    async fn fetch_all(&self) -> Result<Vec<ItemRecord>, SyncError>;

    /// Best-effort append of one record as a new row
    async fn append_one(&self, record: &ItemRecord) -> Result<(), SyncError>;

    /// Overwrite the sheet with a header row followed by `records`
    async fn replace_all(&self, records: &[ItemRecord]) -> Result<(), SyncError>;
}

/// Gateway backed by the spreadsheet values API
pub struct SheetsGateway {
    options: TrackerOptions,
    credentials: Arc<dyn CredentialStore>,
    http_client: Client,
}

impl SheetsGateway {
    pub fn new(options: TrackerOptions, credentials: Arc<dyn CredentialStore>) -> Self {
        Self::with_http_client(options, credentials, Client::new())
    }

    pub fn with_http_client(
        options: TrackerOptions,
        credentials: Arc<dyn CredentialStore>,
        http_client: Client,
    ) -> Self {
        Self {
            options,
            credentials,
            http_client,
        }
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    // The credential is looked up on every call so a save or a connection
    // test takes effect immediately.
    fn client(&self) -> Option<SheetsClient> {
        let key = match configured_credential(self.credentials.as_ref(), &self.options.credential_key) {
            Ok(key) => key?,
            Err(err) => {
                warn!("could not read credential: {}", err);
                return None;
            }
        };
        Some(
            SheetsClient::new(
                &self.options.sheets_url,
                &self.options.spreadsheet_id,
                self.http_client.clone(),
            )
            .with_api_key(&key)
            .with_timeout(self.options.request_timeout),
        )
    }

    /// `Sheet1!A1:I<rows>` for a write of `rows` rows starting at the top
    fn write_range(&self, rows: usize) -> String {
        let (sheet, start, end) = self.options.range_parts();
        let start = column_letters(start);
        let end = column_letters(end);
        match sheet {
            Some(sheet) => format!("{}!{}1:{}{}", sheet, start, end, rows),
            None => format!("{}1:{}{}", start, end, rows),
        }
    }
}

#[async_trait]
impl SyncGateway for SheetsGateway {
    async fn fetch_all(&self) -> Result<Vec<ItemRecord>, SyncError> {
        let Some(client) = self.client() else {
            info!("spreadsheet API key not configured");
            return Err(SyncError::Unconfigured);
        };

        debug!("loading {} from spreadsheet {}", self.options.range, client.spreadsheet_id());
        let values = client
            .get_values(&self.options.range)
            .await
            .map_err(read_error)?;

        let records = records_from_rows(&values.values)?;
        info!("loaded {} items from the spreadsheet", records.len());
        Ok(records)
    }

    async fn append_one(&self, record: &ItemRecord) -> Result<(), SyncError> {
        let client = self.client().ok_or(SyncError::Unauthenticated)?;
        client
            .append_values(&self.options.range, &[record.to_row()], ValueInputOption::Raw)
            .await
            .map_err(write_error)?;
        info!("appended {:?} to the spreadsheet", record.name);
        Ok(())
    }

    async fn replace_all(&self, records: &[ItemRecord]) -> Result<(), SyncError> {
        let client = self.client().ok_or(SyncError::Unauthenticated)?;

        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(SHEET_HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>());
        rows.extend(records.iter().map(ItemRecord::to_row));

        client
            .clear_values(&self.options.range)
            .await
            .map_err(write_error)?;
        client
            .update_values(&self.write_range(rows.len()), &rows, ValueInputOption::Raw)
            .await
            .map_err(write_error)?;
        info!("wrote {} items to the spreadsheet", records.len());
        Ok(())
    }
}

/// Map a values grid onto records.
///
/// The first row is a header. Rows without a name are dropped and the
/// survivors are numbered from 1. A grid that yields no record is `Empty`.
pub fn records_from_rows(rows: &[Vec<String>]) -> Result<Vec<ItemRecord>, SyncError> {
    let records: Vec<ItemRecord> = rows
        .iter()
        .skip(1)
        .filter_map(|row| ItemRecord::from_row(row, ItemId(0)))
        .zip(1i64..)
        .map(|(record, id)| ItemRecord {
            id: ItemId(id),
            ..record
        })
        .collect();

    if records.is_empty() {
        debug!("no data rows in {} fetched rows", rows.len());
        return Err(SyncError::Empty);
    }
    Ok(records)
}

fn read_error(err: SheetsError) -> SyncError {
    warn!("spreadsheet read failed: {}", err);
    match err.status() {
        Some(401) | Some(403) => SyncError::Unauthorized,
        Some(404) => SyncError::NotFound,
        Some(400) => SyncError::BadRequest,
        Some(status) => SyncError::Transport(format!("HTTP {}", status)),
        None => SyncError::Transport(err.to_string()),
    }
}

fn write_error(err: SheetsError) -> SyncError {
    warn!("spreadsheet write failed: {}", err);
    match err.status() {
        Some(401) | Some(403) => SyncError::Unauthenticated,
        Some(status) => SyncError::Transport(format!("HTTP {}", status)),
        None => SyncError::Transport(err.to_string()),
    }
}

fn column_letters(cell: &str) -> &str {
    cell.trim_end_matches(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn header_only_is_empty() {
        let grid = rows(&[&SHEET_HEADER]);
        assert_eq!(records_from_rows(&grid), Err(SyncError::Empty));
        assert_eq!(records_from_rows(&[]), Err(SyncError::Empty));
    }

    #[test]
    fn ids_follow_surviving_rows() {
        let grid = rows(&[
            &SHEET_HEADER,
            &["Lamp", "Electronics"],
            &["", "Ghost"],
            &["Rug", "Furniture"],
        ]);
        let records = records_from_rows(&grid).unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(records[1].name, "Rug");
    }

    #[test]
    fn write_range_spans_rows() {
        let gateway = SheetsGateway::new(
            TrackerOptions::default(),
            Arc::new(MemoryCredentialStore::new()),
        );
        assert_eq!(gateway.write_range(11), "Sheet1!A1:I11");

        let gateway = SheetsGateway::new(
            TrackerOptions::default().with_range("Stock!A2:I500"),
            Arc::new(MemoryCredentialStore::new()),
        );
        assert_eq!(gateway.write_range(3), "Stock!A1:I3");
    }

    #[test]
    fn status_mapping() {
        let api = |status| SheetsError::ApiError {
            status,
            message: String::new(),
        };
        assert_eq!(read_error(api(403)), SyncError::Unauthorized);
        assert_eq!(read_error(api(404)), SyncError::NotFound);
        assert_eq!(read_error(api(400)), SyncError::BadRequest);
        assert_eq!(read_error(api(500)), SyncError::Transport("HTTP 500".to_string()));
        assert_eq!(write_error(api(401)), SyncError::Unauthenticated);
        assert_eq!(write_error(api(403)), SyncError::Unauthenticated);
        assert_eq!(write_error(api(429)), SyncError::Transport("HTTP 429".to_string()));
    }
}
