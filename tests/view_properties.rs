//! Property tests for the derived views.

use std::sync::Arc;

use inventory_tracker::low_stock::low_stock_items;
use inventory_tracker::prelude::*;
use inventory_tracker::views::{compare, filter_items, sort_items};
use proptest::prelude::*;

const CATEGORIES: [&str; 3] = ["Electronics", "Furniture", "Tools"];
const LOCATIONS: [&str; 3] = ["Kitchen", "Garage", "Office"];
const DATES: [&str; 4] = ["2023-01-15", "2023-03-10", "", "someday"];

fn record_strategy() -> impl Strategy<Value = (String, usize, usize, usize, u32, Option<u32>, u32)> {
    (
        "[a-c]{1,3}( [a-c]{1,2})?",
        0..CATEGORIES.len(),
        0..LOCATIONS.len(),
        0..DATES.len(),
        0u32..5,
        prop::option::of(0u32..500),
        0u32..4,
    )
}

fn items_strategy() -> impl Strategy<Value = Vec<ItemRecord>> {
    prop::collection::vec(record_strategy(), 0..25).prop_map(|rows| {
        rows.into_iter()
            .zip(1i64..)
            .map(|((name, category, location, date, quantity, price, threshold), id)| ItemRecord {
                id: ItemId(id),
                name,
                category: CATEGORIES[category].to_string(),
                location: LOCATIONS[location].to_string(),
                quantity,
                price: price.map(f64::from),
                purchase_date: DATES[date].to_string(),
                description: format!("item number {}", id),
                image: None,
                low_stock_threshold: threshold,
            })
            .collect()
    })
}

fn query_strategy() -> impl Strategy<Value = FilterQuery> {
    (
        prop_oneof![Just(String::new()), "[a-cA-C]{1,2}", Just("TOOL".to_string())],
        prop::option::of(prop::sample::select(CATEGORIES.to_vec())),
        prop::option::of(prop::sample::select(LOCATIONS.to_vec())),
        prop::option::of(prop::sample::select(DATES.to_vec())),
    )
        .prop_map(|(search, category, location, date)| {
            FilterQuery::new()
                .with_search(&search)
                .with_category(category)
                .with_location(location)
                .with_purchase_date(date)
        })
}

fn column_strategy() -> impl Strategy<Value = SortColumn> {
    prop::sample::select(SortColumn::ALL.to_vec())
}

fn ids(items: &[&ItemRecord]) -> Vec<ItemId> {
    items.iter().map(|item| item.id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn filter_is_conjunction_of_predicates(items in items_strategy(), query in query_strategy()) {
        let filtered = ids(&filter_items(&items, &query));

        let term = query.search.to_lowercase();
        let expected: Vec<ItemId> = items
            .iter()
            .filter(|r| {
                term.is_empty()
                    || r.name.to_lowercase().contains(&term)
                    || r.description.to_lowercase().contains(&term)
                    || r.category.to_lowercase().contains(&term)
            })
            .filter(|r| query.category.as_deref().map_or(true, |c| r.category == c))
            .filter(|r| query.location.as_deref().map_or(true, |l| r.location == l))
            .filter(|r| query.purchase_date.as_deref().map_or(true, |d| r.purchase_date == d))
            .map(|r| r.id)
            .collect();

        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn sort_is_stable(items in items_strategy(), column in column_strategy(), descending in any::<bool>()) {
        let mut state = SortState::ascending(column);
        if descending {
            state = SortState::toggle(Some(state), column);
        }

        let mut sorted: Vec<&ItemRecord> = items.iter().collect();
        sort_items(&mut sorted, state);

        for pair in sorted.windows(2) {
            let ordering = compare(pair[0], pair[1], column);
            if descending {
                prop_assert_ne!(ordering, std::cmp::Ordering::Less);
            } else {
                prop_assert_ne!(ordering, std::cmp::Ordering::Greater);
            }
            // ids follow collection order, so equal keys must keep ascending ids
            if ordering == std::cmp::Ordering::Equal {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    #[test]
    fn toggling_back_restores_ascending(items in items_strategy(), column in column_strategy()) {
        let first = SortState::toggle(None, column);
        let second = SortState::toggle(Some(first), column);
        let third = SortState::toggle(Some(second), column);
        prop_assert_eq!(first, third);

        let mut view: Vec<&ItemRecord> = items.iter().collect();
        sort_items(&mut view, first);
        let ascending = ids(&view);

        sort_items(&mut view, second);
        sort_items(&mut view, third);
        prop_assert_eq!(ids(&view), ascending);
    }

    #[test]
    fn low_stock_is_below_threshold(items in items_strategy()) {
        let low = ids(&low_stock_items(&items, LowStockPolicy::Below));
        let expected: Vec<ItemId> = items
            .iter()
            .filter(|r| r.quantity < r.low_stock_threshold)
            .map(|r| r.id)
            .collect();
        prop_assert_eq!(low, expected);
    }

    #[test]
    fn non_numeric_quick_edit_is_noop(items in items_strategy(), input in "[a-z ]{0,6}") {
        let mut store = InventoryStore::new();
        store.load(items);
        let before = store.clone();

        for id in 0..30 {
            let _ = store.update_quantity(ItemId(id), &input);
        }
        prop_assert_eq!(store.items(), before.items());
        prop_assert_eq!(store.revision(), before.revision());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn low_stock_tracks_quick_edits(edits in prop::collection::vec((1i64..4, 0u32..4), 1..10)) {
        let credentials = Arc::new(MemoryCredentialStore::new());
        let mut tracker = InventoryTracker::new(TrackerOptions::default(), credentials);

        tokio_test::block_on(async {
            tracker.dispatch(Action::Startup).await;
            for (id, quantity) in &edits {
                tracker
                    .dispatch(Action::QuickEdit { id: ItemId(*id), input: quantity.to_string() })
                    .await;
            }
        });

        let snapshot = tracker.snapshot();
        let expected: Vec<ItemId> = tracker
            .store()
            .items()
            .iter()
            .filter(|r| r.quantity < r.low_stock_threshold)
            .map(|r| r.id)
            .collect();
        let low: Vec<ItemId> = snapshot.low_stock.iter().map(|r| r.id).collect();
        prop_assert_eq!(low, expected);
        prop_assert_eq!(snapshot.revision, tracker.store().revision());
    }
}
