/*!
 * Core Types
 * Identity types shared by signals and their connections
 */

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identity of a signal
///
/// Allocated once per [`Signal`](crate::Signal); clones of a signal share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(u64);

static NEXT_SIGNAL_ID: AtomicU64 = AtomicU64::new(1);

impl SignalId {
    /// Allocate the next identity
    pub(crate) fn next() -> Self {
        Self(NEXT_SIGNAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signal#{}", self.0)
    }
}

/// Equality key of a connected target
///
/// Addresses are taken from the target's `Arc` allocation. A connection keeps a
/// `Weak` to that allocation, so the address cannot be reused by another object
/// while the connection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// Freestanding callable
    Function { addr: usize },
    /// Method looked up on an instance at call time
    Method { addr: usize, method: &'static str },
    /// Synchronization object notified through [`Trigger`](crate::Trigger)
    Trigger { addr: usize },
}

impl TargetKey {
    /// Address of the underlying allocation
    #[inline]
    pub fn addr(&self) -> usize {
        match self {
            TargetKey::Function { addr }
            | TargetKey::Method { addr, .. }
            | TargetKey::Trigger { addr } => *addr,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            TargetKey::Function { .. } => "function",
            TargetKey::Method { .. } => "method",
            TargetKey::Trigger { .. } => "trigger",
        }
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Function { addr } => write!(f, "function@{:#x}", addr),
            TargetKey::Method { addr, method } => write!(f, "{}@{:#x}", method, addr),
            TargetKey::Trigger { addr } => write!(f, "trigger@{:#x}", addr),
        }
    }
}
