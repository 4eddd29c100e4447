//! Inventory Tracker
//!
//! Household and office inventory kept in memory and synchronized with a
//! spreadsheet. The crate owns the record collection, derives the views a
//! front end draws (filtered and sorted list, low-stock list, dropdown
//! options) and talks to the spreadsheet through a gateway that degrades to
//! sample data when the sheet cannot be read.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use inventory_tracker::prelude::*;
//!
//! # async fn run() {
//! let credentials = Arc::new(MemoryCredentialStore::new());
//! let mut tracker = InventoryTracker::new(TrackerOptions::default(), credentials);
//!
//! tracker.dispatch(Action::Startup).await;
//! tracker.dispatch(Action::Search("chair".to_string())).await;
//!
//! for item in &tracker.snapshot().filtered {
//!     println!("{} ({})", item.name, item.display_price());
//! }
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod item;
pub mod low_stock;
pub mod presentation;
pub mod session;
pub mod store;
pub mod views;

pub use crate::session::{Action, InventoryTracker};

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::TrackerOptions;
    pub use crate::credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
    pub use crate::error::{Error, StoreError, SyncError};
    pub use crate::gateway::{SheetsGateway, SyncGateway};
    pub use crate::item::{ItemDraft, ItemId, ItemRecord};
    pub use crate::low_stock::LowStockPolicy;
    pub use crate::presentation::{Notice, NoticeLevel, Renderer, Snapshot};
    pub use crate::session::{Action, InventoryTracker};
    pub use crate::store::InventoryStore;
    pub use crate::views::{FilterQuery, SortColumn, SortDirection, SortState, ViewMode};
}
