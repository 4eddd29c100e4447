//! Error handling for the inventory tracker

use std::fmt;

use thiserror::Error;

use crate::item::ItemId;

/// Why a call to the remote spreadsheet did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No credential has been saved yet. Expected on first run.
    #[error("API key not configured. Please set your API key in Settings.")]
    Unconfigured,

    /// The credential was rejected for reading
    #[error("Access denied. Check your API key and sheet permissions.")]
    Unauthorized,

    /// The credential is not sufficient for writing
    #[error("Write operations require OAuth2 authentication.")]
    Unauthenticated,

    #[error("Spreadsheet not found. Check the spreadsheet ID.")]
    NotFound,

    #[error("Invalid request. Check your API key and sheet range.")]
    BadRequest,

    /// The sheet answered but holds no rows
    #[error("No data found in the spreadsheet")]
    Empty,

    /// Any other status or network failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SyncError {
    /// Whether this failure is a normal condition that needs no alarm
    pub fn is_expected(&self) -> bool {
        matches!(self, SyncError::Unconfigured)
    }
}

/// Rejected store mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),

    #[error("Item id {0} is already in use")]
    DuplicateId(ItemId),

    #[error("Item name cannot be empty")]
    MissingName,
}

/// Failures of the credential persistence collaborator
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential store is corrupt: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Credential store lock poisoned")]
    Poisoned,
}

/// Unified error type for the inventory tracker
#[derive(Error, Debug)]
pub enum Error {
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
