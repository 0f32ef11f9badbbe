/*!
 * Dispatch Pool Configuration Tests
 * Runs in its own binary so no other test starts the pool first
 */

use qsignal::signals::is_started;
use qsignal::{configure, DispatchConfig, Event, Signal, SignalError};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_configure_before_first_async_emission() {
    assert!(!is_started());
    configure(DispatchConfig {
        thread_name: "configured-worker".to_string(),
        ..DispatchConfig::minimal()
    })
    .unwrap();

    let done = Arc::new(Event::new());
    let thread_name = Arc::new(parking_lot::Mutex::new(None));
    let slot = {
        let done = done.clone();
        let thread_name = thread_name.clone();
        Arc::new(move || {
            *thread_name.lock() = std::thread::current().name().map(str::to_string);
            done.set();
        })
    };

    let s = Signal::new();
    s.connect(&slot);
    s.emit_async();

    assert!(done.wait(Duration::from_secs(2)));
    assert!(is_started());
    assert_eq!(thread_name.lock().as_deref(), Some("configured-worker"));

    let err = configure(DispatchConfig::default()).unwrap_err();
    assert!(matches!(err, SignalError::AlreadyConfigured));
}
