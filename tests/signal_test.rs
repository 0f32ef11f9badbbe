/*!
 * Signal Dispatch Tests
 * Synchronous and asynchronous emission, weak ownership and introspection
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use qsignal::{method, Condition, Event, Signal, SignalError, Target};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(2);

/// Callable that sets an event when invoked
fn setter(event: &Arc<Event>) -> Arc<dyn Fn() + Send + Sync> {
    let event = event.clone();
    Arc::new(move || event.set())
}

struct MethodTester {
    to_be_true: Arc<Event>,
    to_be_false: Arc<Event>,
}

impl MethodTester {
    fn new(to_be_true: &Arc<Event>, to_be_false: &Arc<Event>) -> Self {
        Self {
            to_be_true: to_be_true.clone(),
            to_be_false: to_be_false.clone(),
        }
    }

    fn to_be_called(&self) {
        self.to_be_true.set();
    }

    fn not_to_be_called(&self) {
        self.to_be_false.set();
    }
}

#[test]
fn test_simple() {
    let to_be_true = Arc::new(Event::new());
    let slot = setter(&to_be_true);

    let s = Signal::new();
    s.connect(&slot);
    s.emit().unwrap();

    assert!(to_be_true.is_set());
}

#[test]
fn test_async() {
    let to_be_true = Arc::new(Event::new());
    let slot = setter(&to_be_true);

    let s = Signal::new();
    s.connect(&slot);
    s.emit_async();

    assert!(to_be_true.wait(WAIT));
}

#[test]
fn test_event() {
    let to_be_true = Arc::new(Event::new());

    let s = Signal::new();
    s.connect(&to_be_true);
    s.emit_async();

    assert!(to_be_true.wait(WAIT));
}

#[test]
fn test_condition() {
    let to_be_true = Arc::new(Event::new());
    let to_be_notified = Arc::new(Condition::new());

    let waiter = {
        let cond = to_be_notified.clone();
        let done = to_be_true.clone();
        thread::spawn(move || {
            if cond.wait(WAIT) {
                done.set();
            }
        })
    };

    let deadline = Instant::now() + WAIT;
    while to_be_notified.waiters() == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }

    let s = Signal::new();
    s.connect(&to_be_notified);
    s.emit_async();

    assert!(to_be_true.wait(WAIT));
    waiter.join().unwrap();
}

#[test]
fn test_method() {
    let to_be_true = Arc::new(Event::new());
    let to_be_false = Arc::new(Event::new());
    let t = Arc::new(MethodTester::new(&to_be_true, &to_be_false));

    let s = Signal::new();
    s.connect(method!(t, to_be_called));
    s.emit_async();

    assert!(to_be_true.wait(WAIT));
    assert!(!to_be_false.is_set());
}

#[test]
fn test_weakref_function() {
    let to_be_true = Arc::new(Event::new());
    let to_be_false = Arc::new(Event::new());

    let t = setter(&to_be_false);

    let s = Signal::new();
    s.connect(&t);
    s.connect(&to_be_true);

    drop(t);

    s.emit_async();

    assert!(to_be_true.wait(WAIT));
    thread::sleep(Duration::from_millis(200));
    assert!(!to_be_false.is_set());
    assert_eq!(s.connection_count(), 1);
}

#[test]
fn test_weakref_method() {
    let to_be_true = Arc::new(Event::new());
    let to_be_false = Arc::new(Event::new());

    let t = Arc::new(MethodTester::new(&to_be_true, &to_be_false));

    let s = Signal::new();
    s.connect(method!(t, not_to_be_called));
    s.connect(&to_be_true);

    drop(t);

    s.emit_async();

    assert!(to_be_true.wait(WAIT));
    thread::sleep(Duration::from_millis(200));
    assert!(!to_be_false.is_set());
}

#[test]
fn test_weakref_sync_prunes() {
    let hits = Arc::new(AtomicUsize::new(0));
    let make = || {
        let hits = hits.clone();
        Arc::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };
    let alive = make();
    let dead = make();

    let s = Signal::new();
    s.connect(&alive);
    s.connect(&dead);
    assert_eq!(s.connection_count(), 2);

    drop(dead);
    s.emit().unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(s.connection_count(), 1);
}

#[test]
fn test_weakref_sync_objects() {
    let event = Arc::new(Event::new());
    let condition = Arc::new(Condition::new());

    let s = Signal::new();
    s.connect(&event);
    s.connect(&condition);

    assert_eq!(Arc::strong_count(&event), 1);
    assert_eq!(Arc::strong_count(&condition), 1);
    assert_eq!(s.connection_count(), 2);

    drop(event);
    drop(condition);
    s.emit().unwrap();

    assert_eq!(s.connection_count(), 0);
}

#[test]
fn test_emitted() {
    let emitted: Arc<Mutex<Option<Signal>>> = Arc::new(Mutex::new(None));
    let slot = {
        let emitted = emitted.clone();
        Arc::new(move || {
            *emitted.lock() = Signal::emitted();
        })
    };

    let s = Signal::new();
    s.connect(&slot);
    s.emit().unwrap();

    assert_eq!(emitted.lock().clone(), Some(s));
    assert!(Signal::emitted().is_none());
}

#[test]
fn test_emitted_async() {
    let to_be_true = Arc::new(Event::new());
    let emitted: Arc<Mutex<Option<Signal>>> = Arc::new(Mutex::new(None));
    let slot = {
        let emitted = emitted.clone();
        let done = to_be_true.clone();
        Arc::new(move || {
            *emitted.lock() = Signal::emitted();
            done.set();
        })
    };

    let s = Signal::new();
    s.connect(&slot);
    s.emit_async();

    assert!(to_be_true.wait(WAIT));
    assert_eq!(emitted.lock().clone(), Some(s));
}

#[test]
fn test_emitted_under_concurrent_dispatch() {
    const ROUNDS: usize = 50;

    let a = Signal::named("a");
    let b = Signal::named("b");
    let seen: Arc<Mutex<Vec<(String, Option<Signal>)>>> = Arc::new(Mutex::new(Vec::new()));

    let recorder = |label: &'static str| {
        let seen = seen.clone();
        Arc::new(move || {
            seen.lock().push((label.to_string(), Signal::emitted()));
        })
    };
    let on_a = recorder("a");
    let on_b = recorder("b");
    a.connect(&on_a);
    b.connect(&on_b);

    let producers: Vec<_> = [a.clone(), b.clone()]
        .into_iter()
        .map(|signal| {
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    signal.emit_async();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let deadline = Instant::now() + WAIT;
    while seen.lock().len() < 2 * ROUNDS && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    let seen = seen.lock();
    assert_eq!(seen.len(), 2 * ROUNDS);
    for (label, emitted) in seen.iter() {
        let expected = if label == "a" { &a } else { &b };
        assert_eq!(emitted.as_ref(), Some(expected));
    }
}

#[test]
fn test_connection_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let slots: Vec<_> = (0..5)
        .map(|i| {
            let order = order.clone();
            Arc::new(move || order.lock().push(i))
        })
        .collect();

    let s = Signal::new();
    for slot in slots.iter().rev() {
        s.connect(slot);
    }
    s.emit().unwrap();

    assert_eq!(*order.lock(), vec![4, 3, 2, 1, 0]);
}

#[test]
fn test_duplicates_fire_and_disconnect_removes_all() {
    let hits = Arc::new(AtomicUsize::new(0));
    let slot = {
        let hits = hits.clone();
        Arc::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };

    let s = Signal::new();
    let key = s.connect(&slot);
    assert_eq!(s.connect(&slot), key);

    s.emit().unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    assert_eq!(s.disconnect(&slot), 2);
    assert!(!s.is_connected(&slot));
    s.emit().unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // Disconnecting again is a no-op
    assert_eq!(s.disconnect(&slot), 0);
}

#[test]
fn test_disconnect_method_by_name() {
    let to_be_true = Arc::new(Event::new());
    let to_be_false = Arc::new(Event::new());
    let t = Arc::new(MethodTester::new(&to_be_true, &to_be_false));

    let s = Signal::new();
    s.connect(method!(t, to_be_called));
    s.connect(method!(t, not_to_be_called));

    assert_eq!(s.disconnect(method!(t, not_to_be_called)), 1);
    s.emit().unwrap();

    assert!(to_be_true.is_set());
    assert!(!to_be_false.is_set());
}

#[test]
fn test_sync_failure_is_fail_fast() {
    let before = Arc::new(AtomicUsize::new(0));
    let after = Arc::new(AtomicUsize::new(0));

    let first = {
        let before = before.clone();
        Arc::new(move || {
            before.fetch_add(1, Ordering::SeqCst);
        })
    };
    let failing = Arc::new(|| -> anyhow::Result<()> { anyhow::bail!("slot exploded") });
    let last = {
        let after = after.clone();
        Arc::new(move || {
            after.fetch_add(1, Ordering::SeqCst);
        })
    };

    let s = Signal::named("saved");
    s.connect(&first);
    let failing_key = s.connect(&failing);
    s.connect(&last);

    let err = s.emit().unwrap_err();
    assert!(matches!(err, SignalError::SlotFailed { .. }));
    assert_eq!(err.target(), Some(failing_key));
    assert_eq!(before.load(Ordering::SeqCst), 1);
    assert_eq!(after.load(Ordering::SeqCst), 0);
    assert!(Signal::emitted().is_none());
}

#[test]
fn test_async_failure_is_isolated() {
    let to_be_true = Arc::new(Event::new());
    let failing = Arc::new(|| -> anyhow::Result<()> { anyhow::bail!("slot exploded") });
    let panicking = Arc::new(|| -> () { panic!("slot panicked") });

    let s = Signal::new();
    s.connect(&failing);
    s.connect(&panicking);
    s.connect(&to_be_true);

    // Returns immediately; sibling still notified
    s.emit_async();
    assert!(to_be_true.wait(WAIT));
}

#[test]
fn test_slot_may_reenter_signal() {
    let s = Signal::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let late = {
        let hits = hits.clone();
        Arc::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };
    let connector = {
        let s = s.clone();
        let late = late.clone();
        Arc::new(move || {
            s.connect(&late);
        })
    };

    s.connect(&connector);
    s.emit().unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    s.disconnect(&connector);
    s.emit().unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_trigger_target_with_explicit_constructor() {
    let event = Arc::new(Event::new());
    let s = Signal::new();

    let key = s.connect(Target::trigger(&event));
    assert!(s.is_connected(&event));
    assert_eq!(s.disconnect_key(&key), 1);

    s.emit().unwrap();
    assert!(!event.is_set());
}

#[test]
fn test_emit_without_connections() {
    let s = Signal::new();
    s.emit().unwrap();
    s.emit_async();
    assert_eq!(s.disconnect_all(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_inside_tokio_runtime() {
    let notify = Arc::new(tokio::sync::Notify::new());

    let s = Signal::new();
    s.connect(Target::trigger(&notify));
    s.emit_async();

    tokio::time::timeout(WAIT, notify.notified())
        .await
        .expect("notified within timeout");
}
