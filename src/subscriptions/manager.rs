//! Subscription manager for broadcasting list snapshots.

use crate::error::{ListError, Result};
use crate::store::ItemStore;
use crossbeam_channel::{bounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use super::types::{
    ConnectionState, DropReason, Push, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    state: ConnectionState,
    sender: Sender<Push>,
    /// Wakes the async side of the handle.
    ready: Arc<Notify>,
}

impl Subscription {
    /// Try to send a push without blocking.
    fn try_send(&self, push: Push) -> std::result::Result<(), DropReason> {
        match self.sender.try_send(push) {
            Ok(()) => {
                self.ready.notify_one();
                Ok(())
            }
            Err(crossbeam_channel::TrySendError::Full(_)) => Err(DropReason::BufferOverflow),
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => Err(DropReason::Disconnected),
        }
    }

    /// Disconnect the channel, then wake the handle so it observes it.
    fn retire(self) {
        let Subscription { sender, ready, .. } = self;
        drop(sender);
        ready.notify_one();
    }
}

/// Tracks live subscribers and pushes full snapshots of the store to them.
///
/// Pushes never block: each subscriber has a bounded channel and a subscriber
/// that cannot take a push is dropped. Its channel disconnects, the transport
/// closes the connection, and the client has to reconnect to get a fresh
/// snapshot.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
    /// Serializes snapshot reads with their fan-out, so the last push every
    /// subscriber sees is never older than the latest mutation.
    fanout: Mutex<()>,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            fanout: Mutex::new(()),
        }
    }

    /// Register a new connection in the `Connecting` state.
    ///
    /// It receives nothing until [`open`](Self::open) is called.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size.max(1));
        let ready = Arc::new(Notify::new());

        let subscription = Subscription {
            state: ConnectionState::Connecting,
            sender,
            ready: Arc::clone(&ready),
        };
        self.subscriptions.write().insert(id, subscription);

        debug!(subscription = id.0, "subscriber connecting");
        SubscriptionHandle {
            id,
            receiver,
            ready,
        }
    }

    /// Finish the handshake: push the current snapshot to this connection
    /// alone and start including it in broadcasts.
    ///
    /// Opening an already open subscription is a no-op.
    pub fn open(&self, id: SubscriptionId, store: &ItemStore) -> Result<()> {
        let _fanout = self.fanout.lock();

        let mut subs = self.subscriptions.write();
        let sub = subs.get_mut(&id).ok_or(ListError::SubscriptionClosed(id))?;
        if sub.state == ConnectionState::Open {
            return Ok(());
        }

        let push = Push::snapshot(store.list())?;
        let items = push.event.items().len();
        if let Err(reason) = sub.try_send(push) {
            if let Some(sub) = subs.remove(&id) {
                sub.retire();
            }
            warn!(subscription = id.0, ?reason, "subscriber dropped during handshake");
            return Err(ListError::SubscriptionClosed(id));
        }
        sub.state = ConnectionState::Open;

        info!(subscription = id.0, items, "subscriber open");
        Ok(())
    }

    /// Close a subscription. Unknown or already closed ids are ignored.
    ///
    /// Returns true if the subscription was still tracked.
    pub fn close(&self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.write().remove(&id);
        match removed {
            Some(sub) => {
                sub.retire();
                info!(subscription = id.0, reason = ?DropReason::Closed, "subscriber closed");
                true
            }
            None => false,
        }
    }

    /// Current state of a subscription. Untracked ids report `Closed`.
    pub fn state(&self, id: SubscriptionId) -> ConnectionState {
        self.subscriptions
            .read()
            .get(&id)
            .map(|s| s.state)
            .unwrap_or(ConnectionState::Closed)
    }

    /// Get subscription count (any state but `Closed`).
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Number of subscriptions currently receiving broadcasts.
    pub fn open_count(&self) -> usize {
        self.subscriptions
            .read()
            .values()
            .filter(|s| s.state == ConnectionState::Open)
            .count()
    }

    // --- Broadcasting ---

    /// Push the store's full current list to every open subscriber.
    ///
    /// The list is read and serialized once; every subscriber gets the same
    /// message. Failures are handled here: a subscriber that cannot take the
    /// push is dropped, and nothing is reported to the caller. Returns the
    /// number of subscribers the push was delivered to.
    pub fn notify(&self, store: &ItemStore) -> usize {
        let _fanout = self.fanout.lock();

        let push = match Push::snapshot(store.list()) {
            Ok(push) => push,
            Err(e) => {
                error!(error = %e, "failed to encode snapshot, broadcast skipped");
                return 0;
            }
        };

        self.broadcast(push)
    }

    /// Internal broadcast helper. Drops subscribers that fail to receive.
    fn broadcast(&self, push: Push) -> usize {
        let mut delivered = 0;
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if sub.state != ConnectionState::Open {
                    continue;
                }
                match sub.try_send(push.clone()) {
                    Ok(()) => delivered += 1,
                    Err(reason) => to_remove.push((*id, reason)),
                }
            }
        }

        // Remove dropped subscriptions
        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for (id, reason) in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    sub.retire();
                    warn!(subscription = id.0, ?reason, "subscriber dropped");
                }
            }
        }

        debug!(delivered, items = push.event.items().len(), "snapshot broadcast");
        delivered
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
