//! Column sort for the tabular view

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::Error;
use crate::item::ItemRecord;

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    Category,
    Location,
    Quantity,
    Price,
    PurchaseDate,
    Description,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Name,
        SortColumn::Category,
        SortColumn::Location,
        SortColumn::Quantity,
        SortColumn::Price,
        SortColumn::PurchaseDate,
        SortColumn::Description,
    ];

    /// Convert the column to its field name
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Category => "category",
            SortColumn::Location => "location",
            SortColumn::Quantity => "quantity",
            SortColumn::Price => "price",
            SortColumn::PurchaseDate => "purchaseDate",
            SortColumn::Description => "description",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(&['_', '-'][..], "");
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| Error::general(format!("unknown sort column: {}", s)))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The active table sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Header click: the same column flips direction, a new column starts
    /// ascending.
    pub fn toggle(current: Option<SortState>, column: SortColumn) -> SortState {
        match current {
            Some(state) if state.column == column => SortState {
                column,
                direction: state.direction.reversed(),
            },
            _ => SortState::ascending(column),
        }
    }
}

/// Ascending comparison of two records under `column`
pub fn compare(a: &ItemRecord, b: &ItemRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Quantity => (a.quantity as f64).total_cmp(&(b.quantity as f64)),
        SortColumn::Price => price_key(a).total_cmp(&price_key(b)),
        SortColumn::PurchaseDate => date_key(a).cmp(&date_key(b)),
        SortColumn::Name => text_cmp(&a.name, &b.name),
        SortColumn::Category => text_cmp(&a.category, &b.category),
        SortColumn::Location => text_cmp(&a.location, &b.location),
        SortColumn::Description => text_cmp(&a.description, &b.description),
    }
}

/// Stable in-place sort; equal keys keep their relative order in both
/// directions.
pub fn sort_items(items: &mut [&ItemRecord], state: SortState) {
    match state.direction {
        SortDirection::Ascending => items.sort_by(|a, b| compare(a, b, state.column)),
        SortDirection::Descending => items.sort_by(|a, b| compare(b, a, state.column)),
    }
}

fn price_key(item: &ItemRecord) -> f64 {
    item.price.unwrap_or(0.0)
}

// Empty or unparseable dates sort first when ascending
fn date_key(item: &ItemRecord) -> NaiveDate {
    NaiveDate::parse_from_str(item.purchase_date.trim(), "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
}

fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
