//! Session state and action dispatch
//!
//! Each user action becomes one store or gateway operation, followed by the
//! recomputation of every derived view and a render. `dispatch` takes
//! `&mut self`, so actions on one session never interleave and a fetch
//! result always replaces the whole collection.

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::config::TrackerOptions;
use crate::credentials::{configured_credential, CredentialStore};
use crate::error::{Error, Result, SyncError};
use crate::gateway::{SheetsGateway, SyncGateway};
use crate::item::{manual_setup_instructions, sample_items, sample_sheet_records, ItemDraft, ItemId};
use crate::presentation::{Notice, NoticeLevel, Renderer, Snapshot};
use crate::store::InventoryStore;
use crate::views::{project, SortColumn, SortState, ViewMode, ViewState};

/// Everything a user can do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// First load: remote data, or the sample collection if that fails
    Startup,
    /// Re-read the spreadsheet; failures leave the store untouched
    Reload,
    Search(String),
    FilterCategory(Option<String>),
    FilterLocation(Option<String>),
    FilterDate(Option<String>),
    ClearFilters,
    /// Table header click
    SortBy(SortColumn),
    SetViewMode(ViewMode),
    AddItem(ItemDraft),
    QuickEdit { id: ItemId, input: String },
    EditItem { id: ItemId, draft: ItemDraft },
    DeleteItem(ItemId),
    SaveCredential(String),
    /// Try a key; it is kept only if the load succeeds
    TestConnection(String),
    PopulateSampleData,
}

/// One user's inventory session
pub struct InventoryTracker {
    options: TrackerOptions,
    store: InventoryStore,
    view: ViewState,
    snapshot: Snapshot,
    gateway: Arc<dyn SyncGateway>,
    credentials: Arc<dyn CredentialStore>,
    renderer: Option<Box<dyn Renderer + Send>>,
}

impl InventoryTracker {
    /// Create a session syncing with the spreadsheet described by `options`
    pub fn new(options: TrackerOptions, credentials: Arc<dyn CredentialStore>) -> Self {
        let gateway = Arc::new(SheetsGateway::new(options.clone(), credentials.clone()));
        Self::with_gateway(options, gateway, credentials)
    }

    /// Create a session with a custom gateway
    pub fn with_gateway(
        options: TrackerOptions,
        gateway: Arc<dyn SyncGateway>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let mut tracker = Self {
            options,
            store: InventoryStore::new(),
            view: ViewState::default(),
            snapshot: Snapshot::default(),
            gateway,
            credentials,
            renderer: None,
        };
        tracker.refresh();
        tracker
    }

    /// Attach the presentation layer; it is rendered immediately
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer + Send>) {
        self.renderer = Some(renderer);
        self.render(&[]);
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// The derived views as of the last action
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Run one action to completion and return the notices it produced
    pub async fn dispatch(&mut self, action: Action) -> Vec<Notice> {
        debug!("dispatch {:?}", action);
        let notices = match self.handle(action).await {
            Ok(notices) => notices,
            Err(err) => {
                error!("action failed: {}", err);
                vec![err.into()]
            }
        };
        self.refresh();
        self.render(&notices);
        notices
    }

    async fn handle(&mut self, action: Action) -> Result<Vec<Notice>> {
        match action {
            Action::Startup => Ok(self.startup().await),
            Action::Reload => Ok(self.reload().await),
            Action::Search(term) => {
                self.view.query.search = term;
                Ok(Vec::new())
            }
            Action::FilterCategory(category) => {
                self.view.query = self.view.query.clone().with_category(category.as_deref());
                Ok(Vec::new())
            }
            Action::FilterLocation(location) => {
                self.view.query = self.view.query.clone().with_location(location.as_deref());
                Ok(Vec::new())
            }
            Action::FilterDate(date) => {
                self.view.query = self.view.query.clone().with_purchase_date(date.as_deref());
                Ok(Vec::new())
            }
            Action::ClearFilters => {
                self.view.query = Default::default();
                Ok(Vec::new())
            }
            Action::SortBy(column) => {
                self.view.sort = Some(SortState::toggle(self.view.sort, column));
                Ok(Vec::new())
            }
            Action::SetViewMode(mode) => {
                self.view.mode = mode;
                Ok(Vec::new())
            }
            Action::AddItem(draft) => self.add_item(draft).await,
            Action::QuickEdit { id, input } => Ok(self.quick_edit(id, &input)),
            Action::EditItem { id, draft } => {
                if self.store.update(id, draft)? {
                    Ok(vec![Notice::success(
                        "Item updated successfully!",
                        self.options.success_notice_duration,
                    )])
                } else {
                    Ok(Vec::new())
                }
            }
            Action::DeleteItem(id) => {
                if self.store.remove(id) {
                    Ok(vec![Notice::success(
                        "Item deleted successfully!",
                        self.options.success_notice_duration,
                    )])
                } else {
                    Ok(Vec::new())
                }
            }
            Action::SaveCredential(key) => self.save_credential(&key),
            Action::TestConnection(key) => self.test_connection(&key).await,
            Action::PopulateSampleData => self.populate_sample_data().await,
        }
    }

    async fn startup(&mut self) -> Vec<Notice> {
        match self.load_remote().await {
            Ok(count) => vec![self.loaded_notice(count)],
            Err(err) => {
                if err.is_expected() {
                    info!("using sample data: {}", err);
                } else {
                    warn!("failed to load from the spreadsheet: {}", err);
                }
                if self.options.seed_on_failure {
                    self.store.load(sample_items());
                    vec![Notice::info(
                        "Using sample data. Configure the spreadsheet API key to load your data.",
                        self.options.info_notice_duration,
                    )]
                } else {
                    vec![Notice::info(
                        format!("Could not load from the spreadsheet: {}", err),
                        self.options.info_notice_duration,
                    )]
                }
            }
        }
    }

    async fn reload(&mut self) -> Vec<Notice> {
        match self.load_remote().await {
            Ok(count) => vec![self.loaded_notice(count)],
            Err(SyncError::Unconfigured) => vec![Notice::info(
                SyncError::Unconfigured.to_string(),
                self.options.info_notice_duration,
            )],
            Err(err) => vec![Notice::warning(format!("Reload failed: {}", err))],
        }
    }

    async fn load_remote(&mut self) -> std::result::Result<usize, SyncError> {
        let records = self.gateway.fetch_all().await?;
        let count = records.len();
        self.store.load(records);
        Ok(count)
    }

    fn loaded_notice(&self, count: usize) -> Notice {
        Notice::success(
            format!("Loaded {} items from the spreadsheet", count),
            self.options.success_notice_duration,
        )
    }

    async fn add_item(&mut self, draft: ItemDraft) -> Result<Vec<Notice>> {
        let id = self.store.next_id();
        let record = draft.into_record(id)?;
        self.store.add(record.clone())?;
        // Views must reflect the add before the remote call suspends
        self.refresh();

        let mut notices = vec![Notice::success(
            "Item added successfully!",
            self.options.success_notice_duration,
        )];
        if self.options.append_on_add {
            if let Err(err) = self.gateway.append_one(&record).await {
                notices.push(Notice::warning(format!(
                    "Item saved locally, but could not be written to the spreadsheet: {}",
                    err
                )));
            }
        }
        Ok(notices)
    }

    fn quick_edit(&mut self, id: ItemId, input: &str) -> Vec<Notice> {
        match self.store.update_quantity(id, input) {
            Ok(true) => {
                debug!("quantity of item {} set to {:?}", id, input.trim());
                Vec::new()
            }
            Ok(false) => Vec::new(),
            Err(err) => vec![Notice::warning(err.to_string())],
        }
    }

    fn save_credential(&mut self, key: &str) -> Result<Vec<Notice>> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(vec![Notice::blocking(
                NoticeLevel::Error,
                "Please enter a valid API key",
            )]);
        }
        self.credentials.set(&self.options.credential_key, key)?;
        Ok(vec![Notice::blocking(
            NoticeLevel::Success,
            "Settings saved successfully!",
        )])
    }

    async fn test_connection(&mut self, key: &str) -> Result<Vec<Notice>> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(vec![Notice::blocking(
                NoticeLevel::Error,
                "Please enter an API key first",
            )]);
        }

        let credential_key = self.options.credential_key.clone();
        let previous = self.credentials.get(&credential_key)?;
        self.credentials.set(&credential_key, key)?;

        match self.load_remote().await {
            Ok(count) => Ok(vec![Notice::blocking(
                NoticeLevel::Success,
                format!("Connection successful! Loaded {} items from the spreadsheet.", count),
            )]),
            Err(err) => {
                match previous {
                    Some(previous) => self.credentials.set(&credential_key, &previous)?,
                    None => self.credentials.remove(&credential_key)?,
                }
                Ok(vec![Notice::blocking(
                    NoticeLevel::Error,
                    format!("Connection failed: {}", err),
                )])
            }
        }
    }

    async fn populate_sample_data(&mut self) -> Result<Vec<Notice>> {
        if configured_credential(self.credentials.as_ref(), &self.options.credential_key)?.is_none() {
            return Ok(vec![Notice::blocking(
                NoticeLevel::Error,
                "Please configure your API key first in Settings.",
            )]);
        }

        match self.gateway.replace_all(&sample_sheet_records()).await {
            Ok(()) => Ok(vec![Notice::blocking(
                NoticeLevel::Success,
                "Sample data has been added to your spreadsheet! Reload to see the data.",
            )]),
            Err(err) => Ok(vec![Notice::warning(format!(
                "WRITE PERMISSION REQUIRED ({})\n\n\
                 Share the spreadsheet with \"anyone with the link\" as Editor, \
                 or set it up by hand:\n\n{}",
                err,
                manual_setup_instructions(&self.options.spreadsheet_url())
            ))]),
        }
    }

    /// Filtered view, then low-stock view, then option lists, all from the
    /// current store contents.
    fn refresh(&mut self) {
        self.snapshot = project(
            self.store.items(),
            &mut self.view,
            self.options.low_stock_policy,
            self.store.revision(),
        );
    }

    fn render(&mut self, notices: &[Notice]) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&self.snapshot);
            for notice in notices {
                renderer.notify(notice);
            }
        }
    }
}

impl From<Error> for Notice {
    fn from(err: Error) -> Self {
        Notice::blocking(NoticeLevel::Error, err.to_string())
    }
}
