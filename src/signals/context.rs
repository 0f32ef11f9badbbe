/*!
 * Emission Context
 * Thread-local record of which signal is currently dispatching
 */

use super::signal::Signal;
use std::cell::RefCell;

thread_local! {
    static EMITTED: RefCell<Option<Signal>> = const { RefCell::new(None) };
}

/// Signal dispatching on this thread, if any
pub(crate) fn current() -> Option<Signal> {
    EMITTED
        .try_with(|emitted| emitted.borrow().clone())
        .ok()
        .flatten()
}

/// Marks `signal` as the current emitter until dropped
///
/// Restores the previous value on drop, so nested emissions and panicking
/// slots leave the thread in its prior state.
pub(crate) struct EmitScope {
    previous: Option<Signal>,
}

impl EmitScope {
    pub(crate) fn enter(signal: &Signal) -> Self {
        let previous = EMITTED
            .try_with(|emitted| emitted.replace(Some(signal.clone())))
            .ok()
            .flatten();
        Self { previous }
    }
}

impl Drop for EmitScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let _ = EMITTED.try_with(|emitted| *emitted.borrow_mut() = previous);
    }
}
