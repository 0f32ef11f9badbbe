/*!
 * Connection Registry
 * Ordered, lock-protected storage of a signal's connections
 */

use super::target::{Target, Thunk};
use crate::core::types::TargetKey;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// One stored connection
struct ConnectionHandle {
    target: Target,
    /// Connection sequence number, for log correlation only
    seq: u64,
}

/// Live target resolved for one dispatch
pub(crate) struct ResolvedSlot {
    pub key: TargetKey,
    pub thunk: Thunk,
}

/// Connections of a single signal
///
/// Insertion order is invocation order. Duplicates are kept as independent
/// entries. Dead entries are pruned only by [`ConnectionRegistry::resolve_live`].
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<Vec<ConnectionHandle>>,
    next_seq: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a connection
    pub fn add(&self, target: Target) -> TargetKey {
        let key = target.key();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        self.connections.lock().push(ConnectionHandle { target, seq });
        debug!(target_key = %key, seq, "Connected slot");
        key
    }

    /// Remove every connection equal to `key`
    ///
    /// Returns the number of entries removed; absent keys are a no-op.
    pub fn remove(&self, key: &TargetKey) -> usize {
        let mut connections = self.connections.lock();
        let before = connections.len();
        connections.retain(|handle| handle.target.key() != *key);
        let removed = before - connections.len();
        drop(connections);

        if removed > 0 {
            debug!(target_key = %key, removed, "Disconnected slot");
        }
        removed
    }

    /// Resolve every connection, pruning the ones whose target is gone
    ///
    /// Runs under the lock; the returned thunks are invoked outside it.
    pub(crate) fn resolve_live(&self) -> Vec<ResolvedSlot> {
        let mut connections = self.connections.lock();
        let mut live = Vec::with_capacity(connections.len());

        connections.retain(|handle| match handle.target.resolve() {
            Some(thunk) => {
                live.push(ResolvedSlot {
                    key: handle.target.key(),
                    thunk,
                });
                true
            }
            None => {
                trace!(target_key = %handle.target.key(), seq = handle.seq, "Pruned dead slot");
                false
            }
        });

        live
    }

    /// Number of stored connections, including not yet pruned dead ones
    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }

    /// Keys in invocation order
    pub fn keys(&self) -> Vec<TargetKey> {
        self.connections
            .lock()
            .iter()
            .map(|handle| handle.target.key())
            .collect()
    }

    pub fn contains(&self, key: &TargetKey) -> bool {
        self.connections
            .lock()
            .iter()
            .any(|handle| handle.target.key() == *key)
    }

    /// Drop every connection; returns how many were removed
    pub fn clear(&self) -> usize {
        let removed = std::mem::take(&mut *self.connections.lock()).len();
        if removed > 0 {
            debug!(removed, "Cleared all slots");
        }
        removed
    }
}
