//! Subscription system for live list updates.
//!
//! Every connected viewer holds a subscription. Whenever the list changes,
//! the full current list is pushed to all of them as one
//! `{"type":"UPDATE","items":[...]}` message.
//!
//! Subscriptions follow `Connecting -> Open -> Closed`:
//! - `subscribe` registers a connection that receives nothing yet
//! - `open` pushes the current snapshot to it and starts broadcasts
//! - `close` (or a failed push) removes it for good
//!
//! # Example
//!
//! ```ignore
//! let manager = SubscriptionManager::new();
//! let handle = manager.subscribe(SubscriptionConfig::default());
//! manager.open(handle.id, &store)?;
//!
//! loop {
//!     match handle.recv() {
//!         Ok(push) => socket.send(&push.json),
//!         Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    ConnectionState, DropReason, ListEvent, Push, SubscriptionConfig, SubscriptionHandle,
    SubscriptionId, DEFAULT_BUFFER_SIZE,
};
