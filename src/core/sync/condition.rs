/*!
 * Condition
 * Notification point for threads waiting on the next occurrence of something
 */

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct ConditionState {
    /// Bumped by notify_all
    generation: u64,
    /// Outstanding single wakeups, never more than `waiters`
    permits: usize,
    waiters: usize,
}

impl ConditionState {
    /// Consume a pending wakeup for a waiter that entered at `generation`
    fn take_wakeup(&mut self, generation: u64) -> bool {
        if self.generation != generation {
            return true;
        }
        if self.permits > 0 {
            self.permits -= 1;
            return true;
        }
        false
    }
}

/// Condition variable without an associated predicate
///
/// Unlike [`Event`](super::Event) it carries no sticky state: a waiter only
/// observes notifications issued while it is waiting. Connected to a signal,
/// every emission calls [`Condition::notify_all`].
#[derive(Debug, Default)]
pub struct Condition {
    state: Mutex<ConditionState>,
    condvar: Condvar,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next notification
    ///
    /// Returns `false` if the timeout elapsed first.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        let generation = state.generation;
        state.waiters += 1;

        let woken = loop {
            if state.take_wakeup(generation) {
                break true;
            }
            if self.condvar.wait_until(&mut state, deadline).timed_out() {
                // A notify may land between the timeout and reacquiring the lock
                break state.take_wakeup(generation);
            }
        };

        state.waiters -= 1;
        state.permits = state.permits.min(state.waiters);
        woken
    }

    /// Wake one waiter, if any
    pub fn notify_one(&self) {
        let mut state = self.state.lock();
        if state.permits < state.waiters {
            state.permits += 1;
            self.condvar.notify_one();
        }
    }

    /// Wake every current waiter
    pub fn notify_all(&self) {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        state.permits = 0;
        self.condvar.notify_all();
    }

    /// Number of threads currently waiting
    pub fn waiters(&self) -> usize {
        self.state.lock().waiters
    }
}
