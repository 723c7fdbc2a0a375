//! Subscription types for live list updates.

use crate::error::Result;
use crate::types::Item;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Notify;

/// Default number of pushes buffered per subscriber before it is dropped.
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered pushes before dropping the subscriber.
    /// Default: 64
    pub buffer_size: usize,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Lifecycle of a subscriber connection.
///
/// `Connecting -> Open -> Closed`; nothing leaves `Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered, handshake not finished. Receives no broadcasts.
    Connecting,
    /// Handshake done, snapshot delivered. Receives every broadcast.
    Open,
    /// Closed or errored. No longer tracked.
    Closed,
}

/// Events pushed to subscribers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListEvent {
    /// Full current list.
    Update { items: Vec<Item> },
}

impl ListEvent {
    pub fn items(&self) -> &[Item] {
        match self {
            ListEvent::Update { items } => items,
        }
    }
}

/// One message on a subscriber channel.
///
/// The event is serialized once per broadcast; every subscriber gets a clone
/// of the same `Arc`s.
#[derive(Clone, Debug)]
pub struct Push {
    pub event: Arc<ListEvent>,
    /// Wire form of `event`.
    pub json: Arc<str>,
}

impl Push {
    /// Serialize `event` into a shareable push.
    pub fn encode(event: ListEvent) -> Result<Self> {
        let json = serde_json::to_string(&event)?;
        Ok(Self {
            event: Arc::new(event),
            json: Arc::from(json),
        })
    }

    /// Snapshot push for a list of items.
    pub fn snapshot(items: Vec<Item>) -> Result<Self> {
        Self::encode(ListEvent::Update { items })
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiving side went away.
    Disconnected,
    /// Explicitly closed by the transport.
    Closed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle held by the transport for one subscriber.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive pushes.
    pub receiver: crossbeam_channel::Receiver<Push>,
    /// Signalled after every push and when the subscription is removed.
    pub(crate) ready: Arc<Notify>,
}

impl SubscriptionHandle {
    /// Wait for the next push without blocking a thread.
    ///
    /// Errors once the subscription has been removed and its queue drained.
    pub async fn recv_async(&self) -> std::result::Result<Push, crossbeam_channel::RecvError> {
        loop {
            match self.receiver.try_recv() {
                Ok(push) => return Ok(push),
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    return Err(crossbeam_channel::RecvError)
                }
                Err(crossbeam_channel::TryRecvError::Empty) => self.ready.notified().await,
            }
        }
    }

    /// Receive the next push (blocking).
    pub fn recv(&self) -> std::result::Result<Push, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a push (non-blocking).
    pub fn try_recv(&self) -> std::result::Result<Push, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> std::result::Result<Push, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemId;
    use serde_json::json;

    #[test]
    fn test_update_wire_shape() {
        let push = Push::snapshot(vec![Item {
            id: ItemId(1),
            name: "milk".to_string(),
            category: "dairy".to_string(),
            completed: true,
        }])
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&push.json).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "UPDATE",
                "items": [{"id": 1, "name": "milk", "category": "dairy", "completed": true}]
            })
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let push = Push::snapshot(Vec::new()).unwrap();
        assert_eq!(&*push.json, r#"{"type":"UPDATE","items":[]}"#);
        assert!(push.event.items().is_empty());
    }
}
