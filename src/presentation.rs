//! What the presentation layer consumes
//!
//! Rendering itself lives outside this crate. A [`Renderer`] receives a
//! complete [`Snapshot`] after every recomputation and decides how each
//! [`Notice`] is shown.

use std::time::Duration;

use crate::item::ItemRecord;
use crate::low_stock::{LowStockPolicy, QuantityBadge};
use crate::views::{FilterQuery, SortState, ViewMode};

/// Everything needed to draw one frame, consistent with one store revision
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Filtered view, sorted when a sort is active
    pub filtered: Vec<ItemRecord>,
    pub low_stock: Vec<ItemRecord>,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
    pub query: FilterQuery,
    pub sort: Option<SortState>,
    pub mode: ViewMode,
    pub policy: LowStockPolicy,
    pub revision: u64,
}

impl Snapshot {
    /// The low-stock section is hidden entirely when empty
    pub fn show_low_stock(&self) -> bool {
        !self.low_stock.is_empty()
    }

    /// True when filters exclude every record
    pub fn no_matches(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn badge(&self, item: &ItemRecord) -> QuantityBadge {
        self.policy.badge(item)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message produced by an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Needs acknowledgement before the user can continue
    pub blocking: bool,
    /// Auto-dismiss delay for non-blocking notices
    pub dismiss_after: Option<Duration>,
}

impl Notice {
    /// Transient, non-blocking information
    pub fn info(message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            blocking: false,
            dismiss_after: Some(dismiss_after),
        }
    }

    /// Transient, non-blocking confirmation
    pub fn success(message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            blocking: false,
            dismiss_after: Some(dismiss_after),
        }
    }

    /// Non-blocking warning that stays until dismissed
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            blocking: false,
            dismiss_after: None,
        }
    }

    /// Blocking message of any level
    pub fn blocking(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            blocking: true,
            dismiss_after: None,
        }
    }
}

/// Presentation collaborator
pub trait Renderer {
    /// Draw a complete frame
    fn render(&mut self, snapshot: &Snapshot);

    /// Show a notice; ignored by default
    fn notify(&mut self, _notice: &Notice) {}
}
