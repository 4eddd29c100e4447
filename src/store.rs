//! The authoritative in-memory record collection of a session

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};

use crate::error::StoreError;
use crate::item::{parse_quantity_input, ItemDraft, ItemId, ItemRecord};

/// Owns every record of a session.
///
/// Derived views never hold on to records; they borrow the collection and are
/// rebuilt after each mutation. `revision` increases on every change so a
/// caller can tell whether a rebuild is due.
#[derive(Debug, Default, Clone)]
pub struct InventoryStore {
    items: Vec<ItemRecord>,
    last_issued: i64,
    revision: u64,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection. Later duplicates of an id are dropped.
    pub fn load(&mut self, records: Vec<ItemRecord>) {
        let mut seen = HashSet::with_capacity(records.len());
        let mut items = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id) {
                self.last_issued = self.last_issued.max(record.id.value());
                items.push(record);
            } else {
                warn!("dropping record {:?} with duplicate id {}", record.name, record.id);
            }
        }
        debug!("store loaded with {} records", items.len());
        self.items = items;
        self.bump();
    }

    /// A fresh id derived from the clock, never handed out before in this
    /// session and above every id seen so far.
    pub fn next_id(&mut self) -> ItemId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        let id = now.max(self.last_issued + 1);
        self.last_issued = id;
        ItemId(id)
    }

    /// Append a record whose id the caller assigned
    pub fn add(&mut self, record: ItemRecord) -> Result<(), StoreError> {
        if self.get(record.id).is_some() {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.last_issued = self.last_issued.max(record.id.value());
        self.items.push(record);
        self.bump();
        Ok(())
    }

    /// Quick-edit entry point.
    ///
    /// Unknown ids are ignored (`Ok(false)`); input that is not a
    /// non-negative number is rejected and nothing changes.
    pub fn update_quantity(&mut self, id: ItemId, input: &str) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let quantity = parse_quantity_input(input)?;
        self.items[index].quantity = quantity;
        self.bump();
        Ok(true)
    }

    /// Replace every field except the id. Unknown ids are ignored.
    pub fn update(&mut self, id: ItemId, draft: ItemDraft) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.items[index] = draft.into_record(id)?;
        self.bump();
        Ok(true)
    }

    /// Remove the record with `id`; returns whether one was removed
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.bump();
        }
        removed
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Records in insertion order
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::sample_items;

    fn seeded() -> InventoryStore {
        let mut store = InventoryStore::new();
        store.load(sample_items());
        store
    }

    #[test]
    fn load_replaces_everything() {
        let mut store = seeded();
        let first = store.items()[0].clone();
        store.load(vec![first.clone()]);
        assert_eq!(store.items(), &[first]);
    }

    #[test]
    fn load_drops_duplicate_ids() {
        let mut store = InventoryStore::new();
        let mut records = sample_items();
        records[2].id = records[0].id;
        store.load(records);
        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[1].name, "Gaming Chair");
    }

    #[test]
    fn next_id_never_repeats() {
        let mut store = seeded();
        let a = store.next_id();
        let b = store.next_id();
        assert!(b > a);
        assert!(a.value() > 3);

        let record = ItemDraft {
            name: "Kettle".to_string(),
            ..ItemDraft::default()
        }
        .into_record(b)
        .unwrap();
        store.add(record).unwrap();
        assert!(store.remove(b));
        assert!(store.next_id() > b);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store = seeded();
        let duplicate = store.items()[0].clone();
        assert_eq!(store.add(duplicate), Err(StoreError::DuplicateId(ItemId(1))));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn update_quantity_in_place() {
        let mut store = seeded();
        assert_eq!(store.update_quantity(ItemId(2), "5"), Ok(true));
        assert_eq!(store.get(ItemId(2)).unwrap().quantity, 5);
    }

    #[test]
    fn update_quantity_rejects_non_numeric() {
        let mut store = seeded();
        let before = store.items().to_vec();
        let revision = store.revision();
        assert!(store.update_quantity(ItemId(2), "lots").is_err());
        assert_eq!(store.items(), before.as_slice());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn update_quantity_unknown_id_is_noop() {
        let mut store = seeded();
        let revision = store.revision();
        assert_eq!(store.update_quantity(ItemId(99), "5"), Ok(false));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn full_update_keeps_id() {
        let mut store = seeded();
        let mut draft = ItemDraft::from(store.get(ItemId(3)).unwrap());
        draft.location = "Pantry".to_string();
        assert_eq!(store.update(ItemId(3), draft), Ok(true));
        let record = store.get(ItemId(3)).unwrap();
        assert_eq!(record.location, "Pantry");
        assert_eq!(record.name, "Coffee Maker");
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut store = seeded();
        assert!(!store.remove(ItemId(42)));
        assert_eq!(store.len(), 3);
        assert!(store.remove(ItemId(1)));
        assert!(store.get(ItemId(1)).is_none());
    }
}
