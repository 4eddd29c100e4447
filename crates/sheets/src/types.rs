//! Request and response shapes of the values API

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How written cells are interpreted by the spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueInputOption {
    /// Stored exactly as sent
    #[default]
    Raw,

    /// Parsed as if typed into the UI (formulas, dates, numbers)
    UserEntered,
}

impl ValueInputOption {
    /// Convert the option to its query string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// A block of cells, row-major
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,

    /// Absent in the response when the range holds no data
    #[serde(default, deserialize_with = "deserialize_cells")]
    pub values: Vec<Vec<String>>,
}

impl ValueRange {
    /// Build a request body from rows of cells
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        Self {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: rows.to_vec(),
        }
    }

    /// True when the range has no rows at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of an update (and the nested part of an append)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    pub spreadsheet_id: Option<String>,
    pub updated_range: Option<String>,
    pub updated_rows: Option<u32>,
    pub updated_columns: Option<u32>,
    pub updated_cells: Option<u32>,
}

/// Result of an append
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    pub spreadsheet_id: Option<String>,
    pub table_range: Option<String>,
    pub updates: Option<UpdateValuesResponse>,
}

/// Result of a clear
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearValuesResponse {
    pub spreadsheet_id: Option<String>,
    pub cleared_range: Option<String>,
}

/// Error envelope returned by the API on non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetails {
    #[allow(dead_code)]
    pub code: Option<u16>,
    pub message: Option<String>,
    #[allow(dead_code)]
    pub status: Option<String>,
}

// Cells come back as strings with the default render option, but numbers and
// booleans show up when a sheet is configured otherwise.
fn deserialize_cells<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Vec<Value>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
