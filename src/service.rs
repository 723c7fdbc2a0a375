//! Mutation API: validation and orchestration in front of the store.
//!
//! Untrusted input is validated here before it reaches the [`ItemStore`].
//! Every mutation that succeeds triggers exactly one broadcast through the
//! [`SubscriptionManager`]; one that fails triggers none.

use crate::error::Result;
use crate::store::ItemStore;
use crate::subscriptions::{SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager};
use crate::types::{Item, ItemId, ItemPatch, NewItem, StoreStats};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// The shopping list service.
///
/// Cheap to clone; clones share the same store and subscriber registry.
#[derive(Clone)]
pub struct ListService {
    store: Arc<ItemStore>,
    subscriptions: Arc<SubscriptionManager>,
}

impl ListService {
    /// Create a service over a fresh, empty store.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(ItemStore::new()), Arc::new(SubscriptionManager::new()))
    }

    /// Create a service over an existing store and registry.
    pub fn with_parts(store: Arc<ItemStore>, subscriptions: Arc<SubscriptionManager>) -> Self {
        Self {
            store,
            subscriptions,
        }
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    pub fn subscriptions(&self) -> &Arc<SubscriptionManager> {
        &self.subscriptions
    }

    // --- Reads ---

    /// All items in insertion order.
    pub fn list(&self) -> Vec<Item> {
        self.store.list()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    // --- Mutations ---

    /// Create an item from an untrusted JSON body.
    pub fn create(&self, body: &Value) -> Result<Item> {
        let input = NewItem::from_json(body)?;
        Ok(self.create_item(input))
    }

    /// Create an item from already validated input.
    pub fn create_item(&self, input: NewItem) -> Item {
        let item = self.store.create(input);
        self.notify();
        item
    }

    /// Apply a partial update. `id` is the raw path segment.
    pub fn update(&self, id: &str, body: &Value) -> Result<Item> {
        let id = ItemId::parse(id)?;
        let patch = ItemPatch::from_json(body)?;
        self.update_item(id, &patch)
    }

    /// Apply an already validated partial update.
    pub fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item> {
        let item = self.store.update(id, patch)?;
        self.notify();
        Ok(item)
    }

    /// Delete one item. `id` is the raw path segment.
    pub fn delete(&self, id: &str) -> Result<()> {
        let id = ItemId::parse(id)?;
        self.delete_item(id)
    }

    pub fn delete_item(&self, id: ItemId) -> Result<()> {
        self.store.delete(id)?;
        self.notify();
        Ok(())
    }

    /// Delete every item. Always succeeds.
    pub fn delete_all(&self) {
        let removed = self.store.delete_all();
        info!(removed, "list cleared");
        self.notify();
    }

    /// Fire-and-forget broadcast of the current list.
    fn notify(&self) {
        self.subscriptions.notify(&self.store);
    }

    // --- Subscribers ---

    /// Register a connection that has not finished its handshake.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    /// Handshake succeeded: deliver the current snapshot and start broadcasts.
    pub fn open(&self, id: SubscriptionId) -> Result<()> {
        self.subscriptions.open(id, &self.store)
    }

    /// Connection closed or errored.
    pub fn close(&self, id: SubscriptionId) {
        self.subscriptions.close(id);
    }
}

impl Default for ListService {
    fn default() -> Self {
        Self::new()
    }
}
