/*!
 * Signaller
 * Binds name and owner of signals declared as fields of a type
 */

use super::signal::Signal;
use std::any::Any;
use std::sync::{Arc, Weak};

/// Owner of one or more [`Signal`] fields
///
/// Implement it with the [`signaller!`](crate::signaller) macro, which lists
/// the signal fields once and derives their names. Binding gives each
/// declared signal `name == field name` and `emitter == owning instance`,
/// exactly once per signal.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use qsignal::{signaller, Signal, Signaller};
///
/// #[derive(Default)]
/// struct Door {
///     opened: Signal,
///     closed: Signal,
/// }
///
/// signaller!(Door { opened, closed });
///
/// let door = Door::default().into_signaller();
/// assert_eq!(door.opened.name(), Some("opened"));
/// assert!(door.closed.is_emitted_by(&door));
/// ```
pub trait Signaller: Any + Send + Sync + Sized {
    /// Declared signal fields with their names
    fn declared_signals(&self) -> Vec<(&'static str, &Signal)>;

    /// Bind every declared signal to this instance
    ///
    /// Idempotent: already bound signals keep their first binding.
    fn bind_signals(self: &Arc<Self>) {
        let owner: Weak<Self> = Arc::downgrade(self);
        let owner: Weak<dyn Any + Send + Sync> = owner;
        for (name, signal) in self.declared_signals() {
            signal.bind(name, owner.clone());
        }
    }

    /// Wrap in an `Arc` and bind all declared signals
    fn into_signaller(self) -> Arc<Self> {
        let this = Arc::new(self);
        this.bind_signals();
        this
    }

    /// Declared signal by field name, binding it on first access
    fn signal(self: &Arc<Self>, name: &str) -> Option<&Signal> {
        let (field, signal) = self
            .declared_signals()
            .into_iter()
            .find(|(field, _)| *field == name)?;

        if !signal.is_bound() {
            let owner: Weak<Self> = Arc::downgrade(self);
            signal.bind(field, owner);
        }
        Some(signal)
    }
}

/// Implement [`Signaller`] for a type from the names of its `Signal` fields
///
/// ```
/// use qsignal::{signaller, Signal};
///
/// struct Player {
///     started: Signal,
///     finished: Signal,
///     title: String,
/// }
///
/// signaller!(Player { started, finished });
/// ```
#[macro_export]
macro_rules! signaller {
    ($owner:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Signaller for $owner {
            fn declared_signals(&self) -> ::std::vec::Vec<(&'static str, &$crate::Signal)> {
                ::std::vec![$((::std::stringify!($field), &self.$field)),*]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Button {
        clicked: Signal,
        hovered: Signal,
    }

    crate::signaller!(Button { clicked, hovered });

    #[test]
    fn test_lazy_binding_on_access() {
        let button = Arc::new(Button::default());
        assert!(!button.clicked.is_bound());

        let clicked = button.signal("clicked").expect("declared");
        assert_eq!(clicked.name(), Some("clicked"));
        assert!(clicked.is_emitted_by(&button));

        // Only the accessed signal is bound
        assert!(!button.hovered.is_bound());
        assert!(button.signal("missing").is_none());
    }

    #[test]
    fn test_binding_happens_once() {
        let first = Arc::new(Button::default());
        first.bind_signals();

        // A second owner sharing the same signal handle does not rebind it
        let second = Arc::new(Button {
            clicked: first.clicked.clone(),
            hovered: Signal::new(),
        });
        second.bind_signals();

        assert!(second.clicked.is_emitted_by(&first));
        assert!(!second.clicked.is_emitted_by(&second));
        assert!(second.hovered.is_emitted_by(&second));
    }

    #[test]
    fn test_emitter_does_not_keep_owner_alive() {
        let button = Button::default().into_signaller();
        let clicked = button.clicked.clone();

        assert!(clicked.emitter_as::<Button>().is_some());
        drop(button);

        assert!(clicked.emitter().is_none());
        assert_eq!(clicked.name(), Some("clicked"));
    }
}
