/*!
 * Dispatch Pool
 *
 * Runs async slots as independent blocking tasks
 *
 * ## Pool selection
 *
 * ```text
 * emit_async()
 *     │
 *     ├── inside a tokio runtime ──► ambient Handle::spawn_blocking
 *     │
 *     └── plain thread ───────────► process-wide runtime (built on first use
 *                                   from DispatchConfig) ─► spawn_blocking
 * ```
 *
 * Slots are synchronous callables, so each one gets a blocking-pool thread
 * rather than an executor worker.
 */

use crate::core::config::DispatchConfig;
use crate::core::errors::{SignalError, SignalResult};
use parking_lot::{const_mutex, Mutex};
use std::sync::OnceLock;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::info;

enum PoolState {
    /// Not built yet; holds the configuration staged by `configure`
    Pending(Option<DispatchConfig>),
    /// `build_runtime` has consumed the configuration
    Started,
}

/// Configuration slot of the fallback pool
///
/// Staging and consuming happen under one lock, so a `configure` racing the
/// first async emission either lands before the build or is rejected.
struct PoolConfig {
    state: Mutex<PoolState>,
}

impl PoolConfig {
    const fn new() -> Self {
        Self {
            state: const_mutex(PoolState::Pending(None)),
        }
    }

    fn stage(&self, config: DispatchConfig) -> SignalResult<()> {
        let mut state = self.state.lock();
        match &mut *state {
            PoolState::Started => Err(SignalError::AlreadyConfigured),
            PoolState::Pending(pending) => {
                crate::core::config::set_thread_debug_messages(config.thread_debug_messages);
                *pending = Some(config);
                Ok(())
            }
        }
    }

    /// Take the staged configuration, or the environment defaults, and mark started
    fn start(&self) -> DispatchConfig {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, PoolState::Started) {
            PoolState::Pending(Some(config)) => config,
            PoolState::Pending(None) | PoolState::Started => DispatchConfig::from_env(),
        }
    }
}

static POOL_CONFIG: PoolConfig = PoolConfig::new();

/// Process-wide fallback runtime
static FALLBACK: OnceLock<Result<Runtime, String>> = OnceLock::new();

/// Configure the fallback dispatch pool
///
/// Must run before the first async emission outside a tokio runtime. The
/// thread debug flag is applied immediately.
pub fn configure(config: DispatchConfig) -> SignalResult<()> {
    POOL_CONFIG.stage(config)
}

fn build_runtime() -> Result<Runtime, String> {
    let config = POOL_CONFIG.start();

    if config.thread_debug_messages {
        crate::core::config::set_thread_debug_messages(true);
    }

    let runtime = Builder::new_multi_thread()
        .worker_threads(config.worker_threads.max(1))
        .max_blocking_threads(config.max_blocking_threads.max(1))
        .thread_name(config.thread_name.clone())
        .enable_time()
        .build()
        .map_err(|e| e.to_string())?;

    info!(
        worker_threads = config.worker_threads,
        max_blocking_threads = config.max_blocking_threads,
        thread_name = %config.thread_name,
        "Dispatch pool started"
    );
    Ok(runtime)
}

/// Handle used to schedule async slots
pub(crate) fn handle() -> SignalResult<Handle> {
    if let Ok(handle) = Handle::try_current() {
        return Ok(handle);
    }

    FALLBACK
        .get_or_init(build_runtime)
        .as_ref()
        .map(|runtime| runtime.handle().clone())
        .map_err(|e| SignalError::RuntimeUnavailable(e.clone()))
}

/// Whether the fallback runtime has been built
pub fn is_started() -> bool {
    FALLBACK.get().is_some()
}
