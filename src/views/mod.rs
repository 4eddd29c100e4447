//! Derived read views over the store
//!
//! The filtered (and optionally sorted) list, the low-stock list and the
//! dropdown option lists are all rebuilt from the full collection in one
//! pass by [`project`]. Nothing here owns records.

mod filter;
mod options;
mod sort;

use std::fmt;
use std::str::FromStr;

pub use filter::*;
pub use options::*;
pub use sort::*;

use crate::error::Error;
use crate::item::ItemRecord;
use crate::low_stock::{low_stock_items, LowStockPolicy};
use crate::presentation::Snapshot;

/// Card grid or table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    Table,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => f.write_str("grid"),
            ViewMode::Table => f.write_str("table"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" | "cards" => Ok(ViewMode::Grid),
            "table" | "list" => Ok(ViewMode::Table),
            other => Err(Error::general(format!("unknown view mode: {}", other))),
        }
    }
}

/// User-controlled view inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub query: FilterQuery,
    pub sort: Option<SortState>,
    pub mode: ViewMode,
}

/// Rebuild every derived view from `items`.
///
/// Order: filtered view, low-stock view, option lists. When an option list
/// no longer offers the selected category or location, that filter is
/// cleared and the filtered view is rebuilt before returning, so the
/// snapshot is consistent with a single collection state.
pub fn project(
    items: &[ItemRecord],
    state: &mut ViewState,
    policy: LowStockPolicy,
    revision: u64,
) -> Snapshot {
    let mut filtered = filtered_view(items, state);
    let low_stock = low_stock_items(items, policy);
    let options = OptionLists::from_items(items);

    let category_cleared = retain_selection(&mut state.query.category, &options.categories);
    let location_cleared = retain_selection(&mut state.query.location, &options.locations);
    if category_cleared || location_cleared {
        filtered = filtered_view(items, state);
    }

    Snapshot {
        filtered: filtered.into_iter().cloned().collect(),
        low_stock: low_stock.into_iter().cloned().collect(),
        categories: options.categories,
        locations: options.locations,
        query: state.query.clone(),
        sort: state.sort,
        mode: state.mode,
        policy,
        revision,
    }
}

fn filtered_view<'a>(items: &'a [ItemRecord], state: &ViewState) -> Vec<&'a ItemRecord> {
    let mut filtered = filter_items(items, &state.query);
    if let Some(sort) = state.sort {
        sort_items(&mut filtered, sort);
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{sample_items, sample_sheet_records};

    #[test]
    fn projection_of_seed() {
        let mut state = ViewState::default();
        let snapshot = project(&sample_items(), &mut state, LowStockPolicy::Below, 1);
        assert_eq!(snapshot.filtered.len(), 3);
        assert_eq!(snapshot.low_stock.len(), 1);
        assert_eq!(snapshot.categories, vec!["Appliances", "Electronics", "Furniture"]);
        assert_eq!(snapshot.locations, vec!["Bedroom", "Kitchen", "Living Room"]);
        assert!(snapshot.show_low_stock());
    }

    #[test]
    fn options_come_from_full_collection() {
        let mut state = ViewState {
            query: FilterQuery::new().with_search("chair"),
            ..ViewState::default()
        };
        let snapshot = project(&sample_sheet_records(), &mut state, LowStockPolicy::Below, 1);
        assert_eq!(snapshot.filtered.len(), 2);
        assert_eq!(snapshot.categories.len(), 4);
    }

    #[test]
    fn vanished_selection_clears_filter() {
        let mut items = sample_items();
        let mut state = ViewState {
            query: FilterQuery::new().with_category(Some("Electronics")),
            ..ViewState::default()
        };
        let snapshot = project(&items, &mut state, LowStockPolicy::Below, 1);
        assert_eq!(snapshot.filtered.len(), 1);

        items.retain(|i| i.category != "Electronics");
        let snapshot = project(&items, &mut state, LowStockPolicy::Below, 2);
        assert_eq!(state.query.category, None);
        assert_eq!(snapshot.query.category, None);
        assert_eq!(snapshot.filtered.len(), 2);
    }

    #[test]
    fn sort_applies_to_filtered_view() {
        let mut state = ViewState {
            query: FilterQuery::new().with_location(Some("Living Room")),
            sort: Some(SortState {
                column: SortColumn::Price,
                direction: SortDirection::Descending,
            }),
            mode: ViewMode::Table,
        };
        let snapshot = project(&sample_sheet_records(), &mut state, LowStockPolicy::Below, 1);
        let names: Vec<&str> = snapshot.filtered.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["MacBook Pro", "Smart TV", "Robot Vacuum", "Wireless Headphones"]
        );
        assert_eq!(snapshot.mode, ViewMode::Table);
    }

    #[test]
    fn parses_view_mode() {
        assert_eq!("Table".parse::<ViewMode>().unwrap(), ViewMode::Table);
        assert_eq!("grid".parse::<ViewMode>().unwrap(), ViewMode::Grid);
        assert!("carousel".parse::<ViewMode>().is_err());
    }
}
