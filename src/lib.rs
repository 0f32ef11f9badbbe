/*!
 * qsignal
 * Signal/slot dispatch with weakly held targets
 *
 * A [`Signal`] holds an ordered list of connected targets and notifies them
 * when emitted, either synchronously on the calling thread ([`Signal::emit`])
 * or as independent background tasks ([`Signal::emit_async`]).
 *
 * Targets are held weakly: connecting never keeps an observer alive. Three
 * kinds of targets are supported:
 * - plain callables (`Arc<F>` where `F: Fn()`)
 * - methods on an `Arc` instance ([`method!`])
 * - synchronization objects ([`Event`], [`Condition`], anything implementing [`Trigger`])
 *
 * Types implementing [`Signaller`] (see [`signaller!`]) bind their signal
 * fields' name and emitter to the owning instance.
 */

pub mod core;
pub mod monitoring;
pub mod signals;

// Re-exports
pub use crate::core::config::{set_thread_debug_messages, thread_debug_messages, DispatchConfig};
pub use crate::core::errors::{SignalError, SignalResult};
pub use crate::core::sync::{Condition, Event, Trigger};
pub use crate::core::types::{SignalId, TargetKey};
pub use monitoring::init_tracing;
pub use signals::{
    configure, ConnectionRegistry, IntoSlotResult, IntoTarget, Signal, Signaller, Target,
};
