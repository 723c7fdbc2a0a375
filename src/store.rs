//! The authoritative in-memory item store.

use crate::error::{ListError, Result};
use crate::types::{Item, ItemId, ItemPatch, NewItem, StoreStats};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// First id handed out by a fresh store.
const FIRST_ID: ItemId = ItemId(1);

struct Inner {
    /// Ids are allocated monotonically, so key order is insertion order.
    items: BTreeMap<ItemId, Item>,
    next_id: ItemId,
}

/// The item store.
///
/// Owns every [`Item`] and the id allocator. All reads and writes go through
/// one lock: writers are exclusive, readers get point-in-time copies. Nothing
/// outside the store ever holds a mutable reference to an item.
///
/// The allocator is not persisted; a new store starts again at id 1.
pub struct ItemStore {
    inner: RwLock<Inner>,
}

impl ItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: BTreeMap::new(),
                next_id: FIRST_ID,
            }),
        }
    }

    // --- Reads ---

    /// All items in insertion order.
    pub fn list(&self) -> Vec<Item> {
        self.inner.read().items.values().cloned().collect()
    }

    /// A single item by id.
    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.inner.read().items.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        StoreStats {
            items: inner.items.len(),
            next_id: inner.next_id,
        }
    }

    // --- Mutations ---

    /// Allocate the next id and insert a new item.
    pub fn create(&self, input: NewItem) -> Item {
        let mut inner = self.inner.write();

        let id = inner.next_id;
        inner.next_id = id.next();

        let item = Item {
            id,
            name: input.name,
            category: input.category.unwrap_or_default(),
            completed: input.completed.unwrap_or(false),
        };
        inner.items.insert(id, item.clone());

        debug!(id = %id, name = %item.name, category = %item.category, "item created");
        item
    }

    /// Merge `patch` into an existing item and return the result.
    pub fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item> {
        let mut inner = self.inner.write();

        let item = inner.items.get_mut(&id).ok_or(ListError::NotFound(id))?;
        item.apply(patch);

        debug!(id = %id, ?patch, "item updated");
        Ok(item.clone())
    }

    /// Remove one item.
    pub fn delete(&self, id: ItemId) -> Result<Item> {
        let removed = self
            .inner
            .write()
            .items
            .remove(&id)
            .ok_or(ListError::NotFound(id))?;

        debug!(id = %id, "item deleted");
        Ok(removed)
    }

    /// Remove every item. Returns how many were removed.
    ///
    /// The id allocator keeps counting; retired ids are never handed out again.
    pub fn delete_all(&self) -> usize {
        let mut inner = self.inner.write();
        let removed = inner.items.len();
        inner.items.clear();

        debug!(removed, "all items deleted");
        removed
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = ItemStore::new();
        assert!(store.list().is_empty());
        assert!(store.is_empty());
        assert_eq!(store.stats().next_id, ItemId(1));
    }

    #[test]
    fn test_create_applies_defaults() {
        let store = ItemStore::new();

        let item = store.create(NewItem::new("milk", "dairy"));
        assert_eq!(item.id, ItemId(1));
        assert_eq!(item.name, "milk");
        assert_eq!(item.category, "dairy");
        assert!(!item.completed);

        let bare = store.create(NewItem {
            name: "thing".to_string(),
            ..Default::default()
        });
        assert_eq!(bare.id, ItemId(2));
        assert_eq!(bare.category, "");
    }

    #[test]
    fn test_list_in_insertion_order() {
        let store = ItemStore::new();
        for name in ["apples", "bread", "cheese"] {
            store.create(NewItem::new(name, "misc"));
        }

        let names: Vec<_> = store.list().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["apples", "bread", "cheese"]);
    }

    #[test]
    fn test_update_partial() {
        let store = ItemStore::new();
        let item = store.create(NewItem::new("milk", "dairy"));

        let updated = store
            .update(item.id, &ItemPatch::default().completed(true))
            .unwrap();
        assert_eq!(updated.name, "milk");
        assert_eq!(updated.category, "dairy");
        assert!(updated.completed);

        assert_eq!(store.get(item.id), Some(updated));
    }

    #[test]
    fn test_update_missing() {
        let store = ItemStore::new();
        let result = store.update(ItemId(999), &ItemPatch::default().completed(true));
        assert!(matches!(result, Err(ListError::NotFound(ItemId(999)))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete() {
        let store = ItemStore::new();
        let a = store.create(NewItem::new("a", "x"));
        let b = store.create(NewItem::new("b", "x"));

        store.delete(a.id).unwrap();
        assert_eq!(store.list(), vec![b]);

        assert!(matches!(store.delete(a.id), Err(ListError::NotFound(_))));
    }

    #[test]
    fn test_ids_never_reused() {
        let store = ItemStore::new();
        let a = store.create(NewItem::new("a", "x"));
        store.delete(a.id).unwrap();
        let b = store.create(NewItem::new("b", "x"));
        assert!(b.id > a.id);

        assert_eq!(store.delete_all(), 1);
        assert!(store.list().is_empty());

        let c = store.create(NewItem::new("c", "x"));
        assert_eq!(c.id, ItemId(3));
    }
}
