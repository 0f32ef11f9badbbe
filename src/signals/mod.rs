/*!
 * Signals Module
 * Signal/slot dispatch with weakly held targets
 *
 * ```text
 *   connect(target) ──► Target (weak) ──► ConnectionRegistry [ordered]
 *
 *   emit()        ──► resolve_live (prune dead) ──► slot 1, slot 2, ... (caller thread)
 *   emit_async()  ──► resolve_live (prune dead) ──┬─► blocking task ─► slot 1
 *                                                  ├─► blocking task ─► slot 2
 *                                                  └─► ...
 * ```
 */

mod context;
mod executor;
mod registry;
mod signal;
mod signaller;
mod target;

// Re-export public API
pub use executor::{configure, is_started};
pub use registry::ConnectionRegistry;
pub use signal::Signal;
pub use signaller::Signaller;
pub use target::{IntoSlotResult, IntoTarget, Target};
