/*!
 * Connection Targets
 * Normalizes callables, bound methods and sync objects into weak handles
 */

use crate::core::sync::{Condition, Event, Trigger};
use crate::core::types::TargetKey;
use std::fmt;
use std::sync::{Arc, Weak};

/// One invocation of a resolved target, holding a strong reference until it runs
pub(crate) type Thunk = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// Upgrades the weak reference and builds a thunk, or `None` if the target is gone
type Resolver = Box<dyn Fn() -> Option<Thunk> + Send + Sync>;

/// Return values a slot may produce
///
/// `()` for infallible slots, `Result<(), E>` for slots that can fail.
pub trait IntoSlotResult {
    fn into_slot_result(self) -> anyhow::Result<()>;
}

impl IntoSlotResult for () {
    #[inline]
    fn into_slot_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> IntoSlotResult for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    #[inline]
    fn into_slot_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// Normalized connection request
///
/// Holds only a `Weak` to the target, so building or storing a `Target` never
/// keeps the observer alive.
pub struct Target {
    key: TargetKey,
    resolver: Resolver,
}

#[inline]
fn addr_of<T: ?Sized>(arc: &Arc<T>) -> usize {
    Arc::as_ptr(arc) as *const () as usize
}

impl Target {
    /// Freestanding callable invoked with no arguments
    pub fn function<F, R>(slot: &Arc<F>) -> Self
    where
        F: ?Sized + Fn() -> R + Send + Sync + 'static,
        R: IntoSlotResult + 'static,
    {
        let weak: Weak<F> = Arc::downgrade(slot);
        Self {
            key: TargetKey::Function { addr: addr_of(slot) },
            resolver: Box::new(move || {
                let slot = weak.upgrade()?;
                Some(Box::new(move || (*slot)().into_slot_result()) as Thunk)
            }),
        }
    }

    /// Method on an instance, identified by `(instance, name)`
    ///
    /// `method` receives the instance on every call and must not capture it;
    /// the [`method!`](crate::method) macro builds it from a method name.
    pub fn method<T, M, R>(instance: &Arc<T>, name: &'static str, method: M) -> Self
    where
        T: Send + Sync + 'static,
        M: Fn(&T) -> R + Send + Sync + 'static,
        R: IntoSlotResult + 'static,
    {
        let weak = Arc::downgrade(instance);
        let method = Arc::new(method);
        Self {
            key: TargetKey::Method {
                addr: addr_of(instance),
                method: name,
            },
            resolver: Box::new(move || {
                let this = weak.upgrade()?;
                let method = Arc::clone(&method);
                Some(Box::new(move || (*method)(&*this).into_slot_result()) as Thunk)
            }),
        }
    }

    /// Synchronization object; emission calls [`Trigger::trigger`]
    pub fn trigger<N>(object: &Arc<N>) -> Self
    where
        N: Trigger,
    {
        let weak = Arc::downgrade(object);
        Self {
            key: TargetKey::Trigger { addr: addr_of(object) },
            resolver: Box::new(move || {
                let object = weak.upgrade()?;
                Some(Box::new(move || {
                    object.trigger();
                    Ok(())
                }) as Thunk)
            }),
        }
    }

    #[inline]
    pub fn key(&self) -> TargetKey {
        self.key
    }

    /// Attempt weak resolution
    #[inline]
    pub(crate) fn resolve(&self) -> Option<Thunk> {
        (self.resolver)()
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target").field("key", &self.key).finish()
    }
}

/// Anything that can be connected to a signal
///
/// Implemented for `&Arc<F>` where `F: Fn() -> R`, for `&Arc<Event>` and
/// `&Arc<Condition>`, and for an already built [`Target`].
pub trait IntoTarget {
    fn into_target(self) -> Target;
}

impl IntoTarget for Target {
    #[inline]
    fn into_target(self) -> Target {
        self
    }
}

impl<F, R> IntoTarget for &Arc<F>
where
    F: ?Sized + Fn() -> R + Send + Sync + 'static,
    R: IntoSlotResult + 'static,
{
    #[inline]
    fn into_target(self) -> Target {
        Target::function(self)
    }
}

impl IntoTarget for &Arc<Event> {
    #[inline]
    fn into_target(self) -> Target {
        Target::trigger(self)
    }
}

impl IntoTarget for &Arc<Condition> {
    #[inline]
    fn into_target(self) -> Target {
        Target::trigger(self)
    }
}

/// Build a method [`Target`] from an `Arc` instance and a method name
///
/// ```
/// use std::sync::Arc;
/// use qsignal::{method, Signal};
///
/// struct Door;
/// impl Door {
///     fn on_open(&self) {}
/// }
///
/// let door = Arc::new(Door);
/// let opened = Signal::new();
/// opened.connect(method!(door, on_open));
/// opened.emit().unwrap();
/// ```
#[macro_export]
macro_rules! method {
    ($instance:expr, $method:ident) => {
        $crate::Target::method(&$instance, ::std::stringify!($method), |this| {
            this.$method()
        })
    };
}
