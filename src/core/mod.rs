/*!
 * Core Module
 * Fundamental types, configuration, error handling and sync primitives
 */

pub mod config;
pub mod errors;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use config::{set_thread_debug_messages, thread_debug_messages, DispatchConfig};
pub use errors::*;
pub use sync::{Condition, Event, Trigger};
pub use types::*;
