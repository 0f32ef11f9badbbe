/*!
 * Trigger Trait
 * The operation a signal performs on a connected synchronization object
 */

use super::{Condition, Event};

/// Synchronization object that can be told "the signal occurred"
///
/// Connect any `Arc<T: Trigger>` through
/// [`Target::trigger`](crate::Target::trigger); [`Event`] and [`Condition`]
/// can also be connected directly.
pub trait Trigger: Send + Sync + 'static {
    fn trigger(&self);
}

impl Trigger for Event {
    #[inline]
    fn trigger(&self) {
        self.set();
    }
}

impl Trigger for Condition {
    #[inline]
    fn trigger(&self) {
        self.notify_all();
    }
}

/// Stores a permit when nobody is waiting, so a task that starts awaiting
/// `notified()` after the emission still observes it
impl Trigger for tokio::sync::Notify {
    #[inline]
    fn trigger(&self) {
        self.notify_one();
    }
}
