//! # Shopping List
//!
//! A collaborative shopping list with live synchronization. The server holds
//! the authoritative list in memory and pushes the full list to every
//! connected client after each change.
//!
//! ## Core Concepts
//!
//! - **Store**: In-memory items plus a monotonic id allocator
//! - **Service**: Validates input, mutates the store, triggers broadcasts
//! - **Subscriptions**: Connected viewers receiving full snapshots
//! - **Server**: REST endpoints and a receive-only WebSocket stream
//!
//! ## Example
//!
//! ```ignore
//! use shoplist::{ListService, SubscriptionConfig};
//! use serde_json::json;
//!
//! let service = ListService::new();
//! let viewer = service.subscribe(SubscriptionConfig::default());
//! service.open(viewer.id)?;
//!
//! let milk = service.create(&json!({"name": "milk", "category": "dairy"}))?;
//! service.update(&milk.id.to_string(), &json!({"completed": true}))?;
//!
//! // viewer received: the empty snapshot, then one UPDATE per mutation
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use config::{ConfigError, ServerConfig};
pub use error::{ListError, Result};
pub use service::ListService;
pub use store::ItemStore;
pub use subscriptions::{
    ConnectionState, DropReason, ListEvent, Push, SubscriptionConfig, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
