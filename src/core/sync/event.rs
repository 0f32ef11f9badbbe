/*!
 * Event
 * Manual-reset flag that threads can wait on
 */

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Manual-reset event
///
/// Once set, every current and future waiter returns immediately until
/// [`Event::clear`] is called. Connecting an `Arc<Event>` to a signal sets the
/// event on every emission.
#[derive(Debug, Default)]
pub struct Event {
    flag: Mutex<bool>,
    condvar: Condvar,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake all waiters
    pub fn set(&self) {
        let mut flag = self.flag.lock();
        *flag = true;
        self.condvar.notify_all();
    }

    /// Reset the flag
    pub fn clear(&self) {
        *self.flag.lock() = false;
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        *self.flag.lock()
    }

    /// Block until the flag is set or the timeout elapses
    ///
    /// Returns the flag value on return, so `false` means the wait timed out.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut flag = self.flag.lock();

        while !*flag {
            if self.condvar.wait_until(&mut flag, deadline).timed_out() {
                break;
            }
        }

        *flag
    }

    /// Block until the flag is set
    pub fn wait_forever(&self) {
        let mut flag = self.flag.lock();
        while !*flag {
            self.condvar.wait(&mut flag);
        }
    }
}
