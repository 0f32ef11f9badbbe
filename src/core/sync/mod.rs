/*!
 * Synchronization Primitives
 *
 * Event and condition objects that can be connected to a signal as targets
 */

mod condition;
mod event;
mod trigger;

pub use condition::Condition;
pub use event::Event;
pub use trigger::Trigger;
