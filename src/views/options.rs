//! Distinct category and location values for dropdowns

use std::collections::BTreeSet;

use crate::item::ItemRecord;

/// Dropdown contents derived from the full collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLists {
    pub categories: Vec<String>,
    pub locations: Vec<String>,
}

impl OptionLists {
    pub fn from_items(items: &[ItemRecord]) -> Self {
        Self {
            categories: distinct_values(items, |item| &item.category),
            locations: distinct_values(items, |item| &item.location),
        }
    }
}

/// Trimmed, non-empty, de-duplicated values in ascending order
pub fn distinct_values<F>(items: &[ItemRecord], key: F) -> Vec<String>
where
    F: Fn(&ItemRecord) -> &String,
{
    items
        .iter()
        .map(|item| key(item).trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Keep `selection` if it is still offered, otherwise clear it.
/// Returns true when the selection was cleared.
pub fn retain_selection(selection: &mut Option<String>, options: &[String]) -> bool {
    match selection {
        Some(value) if !options.iter().any(|o| o == value) => {
            *selection = None;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{sample_items, sample_sheet_records, ItemDraft, ItemId};

    #[test]
    fn sorted_and_distinct() {
        let lists = OptionLists::from_items(&sample_sheet_records());
        assert_eq!(
            lists.categories,
            vec!["Appliances", "Clothing", "Electronics", "Furniture"]
        );
        assert_eq!(lists.locations, vec!["Bedroom", "Kitchen", "Living Room"]);
    }

    #[test]
    fn skips_blank_values() {
        let mut items = sample_items();
        items.push(
            ItemDraft {
                name: "Mystery box".to_string(),
                ..ItemDraft::default()
            }
            .into_record(ItemId(4))
            .unwrap(),
        );
        let lists = OptionLists::from_items(&items);
        assert_eq!(lists.categories.len(), 3);
        assert!(!lists.locations.contains(&String::new()));
    }

    #[test]
    fn selection_survives_when_present() {
        let options = vec!["Bedroom".to_string(), "Kitchen".to_string()];
        let mut selection = Some("Kitchen".to_string());
        assert!(!retain_selection(&mut selection, &options));
        assert_eq!(selection.as_deref(), Some("Kitchen"));

        let mut gone = Some("Garage".to_string());
        assert!(retain_selection(&mut gone, &options));
        assert_eq!(gone, None);

        let mut none = None;
        assert!(!retain_selection(&mut none, &options));
    }
}
