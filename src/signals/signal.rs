/*!
 * Signal
 * Public dispatch object: connect, disconnect, emit, emit_async
 */

use super::context::{self, EmitScope};
use super::executor;
use super::registry::{ConnectionRegistry, ResolvedSlot};
use super::target::{IntoTarget, Thunk};
use crate::core::config::thread_debug_messages;
use crate::core::errors::{SignalError, SignalResult};
use crate::core::types::{SignalId, TargetKey};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, error, warn};

struct SignalInner {
    id: SignalId,
    registry: ConnectionRegistry,
    name: OnceLock<String>,
    emitter: OnceLock<Weak<dyn Any + Send + Sync>>,
}

/// Emitter of notifications to zero or more connected targets
///
/// `Signal` is a handle: clones share the same connections and identity, and
/// compare equal. Targets are held weakly, so connecting never keeps an
/// observer alive; targets that have been dropped are skipped and pruned on
/// the next emission.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use qsignal::Signal;
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let slot = {
///     let hits = hits.clone();
///     Arc::new(move || {
///         hits.fetch_add(1, Ordering::SeqCst);
///     })
/// };
///
/// let clicked = Signal::new();
/// clicked.connect(&slot);
/// clicked.emit().unwrap();
///
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Signal {
    inner: Arc<SignalInner>,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                id: SignalId::next(),
                registry: ConnectionRegistry::new(),
                name: OnceLock::new(),
                emitter: OnceLock::new(),
            }),
        }
    }

    /// Signal with a name but no emitter
    pub fn named(name: impl Into<String>) -> Self {
        let signal = Self::new();
        let _ = signal.inner.name.set(name.into());
        signal
    }

    /// Signal dispatching on the calling thread, if any
    ///
    /// Inside a slot invoked by [`Signal::emit_async`] this is the signal that
    /// scheduled it; during [`Signal::emit`] it is the emitting signal.
    /// Outside any dispatch it is `None`.
    pub fn emitted() -> Option<Signal> {
        context::current()
    }

    #[inline]
    pub fn id(&self) -> SignalId {
        self.inner.id
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.get().map(String::as_str)
    }

    /// Owner this signal was bound to, while it is alive
    pub fn emitter(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.inner.emitter.get()?.upgrade()
    }

    /// Owner downcast to its concrete type
    pub fn emitter_as<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.emitter()?.downcast::<T>().ok()
    }

    /// Whether `owner` is the object this signal was bound to
    pub fn is_emitted_by<T>(&self, owner: &Arc<T>) -> bool
    where
        T: Any + Send + Sync,
    {
        self.inner
            .emitter
            .get()
            .map(|emitter| {
                emitter.as_ptr() as *const () as usize == Arc::as_ptr(owner) as *const () as usize
            })
            .unwrap_or(false)
    }

    /// Whether an emitter has been bound
    pub fn is_bound(&self) -> bool {
        self.inner.emitter.get().is_some()
    }

    /// One-time binding of name and emitter
    ///
    /// Each value is assigned at most once; later calls leave it untouched.
    /// Returns `true` if the emitter was assigned by this call.
    pub(crate) fn bind(&self, name: &str, emitter: Weak<dyn Any + Send + Sync>) -> bool {
        let _ = self.inner.name.get_or_init(|| name.to_string());
        let bound = self.inner.emitter.set(emitter).is_ok();
        if bound {
            debug!(signal = %self, "Bound signal to owner");
        }
        bound
    }

    /// Connect a target; it is notified on every emission while it is alive
    ///
    /// Connecting the same target twice creates two entries that each fire.
    pub fn connect(&self, target: impl IntoTarget) -> TargetKey {
        self.inner.registry.add(target.into_target())
    }

    /// Disconnect every entry equal to `target`; returns how many were removed
    pub fn disconnect(&self, target: impl IntoTarget) -> usize {
        self.disconnect_key(&target.into_target().key())
    }

    /// Disconnect by the key returned from [`Signal::connect`]
    pub fn disconnect_key(&self, key: &TargetKey) -> usize {
        self.inner.registry.remove(key)
    }

    /// Drop every connection
    pub fn disconnect_all(&self) -> usize {
        self.inner.registry.clear()
    }

    /// Whether an entry equal to `target` is connected
    pub fn is_connected(&self, target: impl IntoTarget) -> bool {
        self.inner.registry.contains(&target.into_target().key())
    }

    /// Stored connections, including dead ones not yet pruned
    pub fn connection_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Synchronous emission
    ///
    /// Invokes every live target in connection order on the calling thread.
    /// The first slot returning an error stops the dispatch: the error is
    /// returned as [`SignalError::SlotFailed`] and the remaining slots are
    /// skipped. A panicking slot unwinds into the caller.
    pub fn emit(&self) -> SignalResult<()> {
        let slots = self.inner.registry.resolve_live();
        let _scope = EmitScope::enter(self);

        for ResolvedSlot { key, thunk } in slots {
            if let Err(source) = thunk() {
                debug!(signal = %self, target_key = %key, error = %source, "Slot failed, aborting emission");
                return Err(SignalError::SlotFailed {
                    signal: self.to_string(),
                    target: key,
                    source,
                });
            }
        }

        Ok(())
    }

    /// Fire-and-forget emission
    ///
    /// Schedules every live target as its own blocking task and returns
    /// immediately. No ordering between targets. Errors and panics of a slot
    /// are logged and never reach the caller or sibling slots.
    pub fn emit_async(&self) {
        let slots = self.inner.registry.resolve_live();
        if slots.is_empty() {
            return;
        }

        let handle = match executor::handle() {
            Ok(handle) => handle,
            Err(e) => {
                error!(signal = %self, error = %e, dropped = slots.len(), "Async emission dropped");
                return;
            }
        };

        for ResolvedSlot { key, thunk } in slots {
            let signal = self.clone();
            handle.spawn_blocking(move || run_slot(signal, key, thunk));
        }
    }
}

/// Body of one async dispatch task
fn run_slot(signal: Signal, key: TargetKey, thunk: Thunk) {
    let _scope = EmitScope::enter(&signal);

    if thread_debug_messages() {
        let thread = std::thread::current();
        debug!(
            signal = %signal,
            target_key = %key,
            thread_id = ?thread.id(),
            thread_name = thread.name().unwrap_or("<unnamed>"),
            "Dispatching slot"
        );
    }

    match std::panic::catch_unwind(AssertUnwindSafe(thunk)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(signal = %signal, target_key = %key, error = %e, "Async slot failed");
        }
        Err(panic) => {
            error!(
                signal = %signal,
                target_key = %key,
                panic = panic_message(panic.as_ref()),
                "Async slot panicked"
            );
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Signal {}

impl Hash for Signal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.inner.id),
            None => write!(f, "{}", self.inner.id),
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("name", &self.name())
            .field("bound", &self.is_bound())
            .field("connections", &self.connection_count())
            .finish()
    }
}
