/*!
 * Dispatch Configuration
 *
 * Runtime configuration for the async dispatch pool and the process-wide
 * thread debug flag
 */

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable enabling worker thread debug messages
pub const ENV_THREAD_DEBUG: &str = "QSIGNAL_THREAD_DEBUG";
/// Environment variable overriding the number of runtime worker threads
pub const ENV_WORKER_THREADS: &str = "QSIGNAL_WORKER_THREADS";
/// Environment variable overriding the blocking pool size
pub const ENV_MAX_BLOCKING_THREADS: &str = "QSIGNAL_MAX_BLOCKING_THREADS";

/// Default blocking pool size; each async slot occupies one blocking thread
pub const DEFAULT_MAX_BLOCKING_THREADS: usize = 64;

const FLAG_UNSET: u8 = 0;
const FLAG_OFF: u8 = 1;
const FLAG_ON: u8 = 2;

/// Seeded from the environment on first read unless set explicitly before
static THREAD_DEBUG_MESSAGES: AtomicU8 = AtomicU8::new(FLAG_UNSET);

#[inline]
fn flag_value(enabled: bool) -> u8 {
    if enabled {
        FLAG_ON
    } else {
        FLAG_OFF
    }
}

/// Truthy environment value
fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

/// Toggle debug logging of worker thread identity during async dispatch
///
/// Purely observational: dispatch behaves the same either way. Overrides
/// `QSIGNAL_THREAD_DEBUG`.
pub fn set_thread_debug_messages(enabled: bool) {
    THREAD_DEBUG_MESSAGES.store(flag_value(enabled), Ordering::Relaxed);
}

/// Whether worker tasks log their thread identity
///
/// Defaults to `QSIGNAL_THREAD_DEBUG`, read once on first use.
#[inline]
pub fn thread_debug_messages() -> bool {
    match THREAD_DEBUG_MESSAGES.load(Ordering::Relaxed) {
        FLAG_UNSET => seed_thread_debug_messages(),
        value => value == FLAG_ON,
    }
}

#[cold]
fn seed_thread_debug_messages() -> bool {
    let seeded = std::env::var(ENV_THREAD_DEBUG)
        .map(|v| parse_flag(&v))
        .unwrap_or(false);

    // An explicit set that raced with seeding wins
    match THREAD_DEBUG_MESSAGES.compare_exchange(
        FLAG_UNSET,
        flag_value(seeded),
        Ordering::Relaxed,
        Ordering::Relaxed,
    ) {
        Ok(_) => seeded,
        Err(current) => current == FLAG_ON,
    }
}

/// Dispatch pool configuration
///
/// Only consulted when `emit_async` runs outside a tokio runtime and the crate
/// has to build its own pool. Inside a runtime, the ambient blocking pool is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Runtime worker threads (drive the pool, slots do not run on them)
    pub worker_threads: usize,
    /// Upper bound on concurrently running async slots
    pub max_blocking_threads: usize,
    /// Thread name prefix
    pub thread_name: String,
    /// Initial value of the thread debug flag
    pub thread_debug_messages: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_threads: 1,
            max_blocking_threads: DEFAULT_MAX_BLOCKING_THREADS,
            thread_name: "qsignal-worker".to_string(),
            thread_debug_messages: false,
        }
    }
}

impl DispatchConfig {
    /// Smallest usable pool, for tests and constrained environments
    pub fn minimal() -> Self {
        Self {
            max_blocking_threads: 4,
            ..Default::default()
        }
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup; unparsable values are ignored
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = lookup(ENV_WORKER_THREADS).and_then(|v| v.trim().parse::<usize>().ok()) {
            self.worker_threads = n.max(1);
        }
        if let Some(n) =
            lookup(ENV_MAX_BLOCKING_THREADS).and_then(|v| v.trim().parse::<usize>().ok())
        {
            self.max_blocking_threads = n.max(1);
        }
        if let Some(v) = lookup(ENV_THREAD_DEBUG) {
            self.thread_debug_messages = parse_flag(&v);
        }
        self
    }
}
