#![forbid(unsafe_code)]

//! Observable value wrapper with keyed listeners and version tracking.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage. Every assignment bumps the version and notifies all registered
//! listeners, synchronously and in registration order. Listeners are keyed by
//! [`ListenerId`], either generated on subscription or supplied by the caller
//! so it can unsubscribe later without keeping the returned id around.
//!
//! # Performance
//!
//! | Operation       | Complexity                         |
//! |-----------------|------------------------------------|
//! | `get()`         | O(1) + clone of `T`                |
//! | `set()`         | O(L) + clone of `T`, L = listeners |
//! | `subscribe()`   | O(L)                               |
//! | `unsubscribe()` | O(L)                               |
//!
//! # Re-entrancy
//!
//! Listeners run with no interior borrow held, so a listener may call
//! [`set`](Observable::set), subscribe, or unsubscribe. A nested `set` runs its
//! own complete notification cycle immediately (depth-first). Once it returns,
//! the outer cycle resumes and hands the *current* value to the remaining
//! listeners, so the last value any listener sees is the stored one.
//! Nothing bounds the recursion: a listener that unconditionally sets the
//! value will overflow the stack. Past
//! [`ObservableConfig::reentrancy_warn_depth`] nested cycles a `warn` event is
//! emitted (with the `tracing` feature).
//!
//! Calling `set`/`update` from inside [`with`](Observable::with) or from the
//! closure passed to [`update`](Observable::update) panics (RefCell borrow
//! rules).
//!
//! # Failure Modes
//!
//! - **Listener cycle**: a listener that captures a clone of its own
//!   observable keeps the state alive until that listener is unsubscribed.
//!   Capture a [`Subscription`] owner or a weak handle instead.
//! - **Listener panic**: the panic propagates out of `set`; listeners after
//!   the panicking one are not invoked for that cycle.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use uuid::Uuid;

use super::config::ObservableConfig;

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

type Listener<T> = Rc<dyn Fn(&T)>;

/// A registered listener. `live` is cleared when the entry is removed or
/// replaced, so cycle snapshots and [`Subscription`] guards can tell.
struct Entry<T> {
    id: ListenerId,
    listener: Listener<T>,
    live: Rc<Cell<bool>>,
}

impl<T> Entry<T> {
    fn retire(self) {
        self.live.set(false);
    }
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            listener: Rc::clone(&self.listener),
            live: Rc::clone(&self.live),
        }
    }
}

/// Key under which a listener is registered on an [`Observable`].
///
/// Generated ids are random (UUID v4); callers that want to unsubscribe
/// deterministically can derive one from their own data with
/// [`from_u128`](ListenerId::from_u128) or `From<Uuid>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// A fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// A fixed id from a 128-bit value.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ListenerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Mutable part of the shared state.
struct ObservableState<T> {
    value: T,
    version: u64,
    /// Registration order is delivery order. Ids are unique.
    listeners: Vec<Entry<T>>,
}

/// Shared interior for [`Observable<T>`].
struct Shared<T> {
    state: RefCell<ObservableState<T>>,
    /// Number of notification cycles currently on the stack.
    depth: Cell<usize>,
    config: ObservableConfig,
}

/// A shared, version-tracked value that notifies keyed listeners on every
/// assignment.
///
/// Cloning an `Observable` creates a new handle to the **same** state; both
/// handles see the same value and share listeners.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each `set`/`update`, and on each
///    `set_if_changed` that actually assigns.
/// 2. Each assignment invokes every listener registered at the start of the
///    cycle (and still registered when its turn comes) exactly once, with the
///    value stored at the moment of the call.
/// 3. Listener ids are unique; re-registering an id replaces the listener in
///    place, keeping its position.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Observable")
            .field("value", &state.value)
            .field("version", &state.version)
            .field("listener_count", &state.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create a new observable with the given initial value and the default
    /// configuration.
    ///
    /// The initial version is 0 and no listeners are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_config(value, ObservableConfig::default())
    }

    /// Create a new observable with an explicit configuration.
    #[must_use]
    pub fn with_config(value: T, config: ObservableConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(ObservableState {
                    value,
                    version: 0,
                    listeners: Vec::new(),
                }),
                depth: Cell::new(0),
                config,
            }),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.state.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if `f` assigns to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.state.borrow().value)
    }

    /// Replace the value unconditionally and notify every listener with it.
    pub fn set(&self, value: T) {
        {
            let mut state = self.shared.state.borrow_mut();
            state.value = value;
            state.version += 1;
        }
        self.notify();
    }

    /// Modify the value in place, then notify every listener with the result.
    ///
    /// # Panics
    ///
    /// Panics if `f` assigns to this observable.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut state = self.shared.state.borrow_mut();
            f(&mut state.value);
            state.version += 1;
        }
        self.notify();
    }

    /// Register a listener under a fresh id. The listener is not invoked.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        let id = ListenerId::new();
        self.insert(id, Rc::new(listener));
        id
    }

    /// Register a listener under a fresh id, then invoke it once with the
    /// current value before returning.
    pub fn subscribe_and_fire(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        let id = ListenerId::new();
        self.insert_and_fire(id, Rc::new(listener));
        id
    }

    /// Register a listener under a caller-supplied id, replacing any listener
    /// already registered under it. The listener is not invoked.
    pub fn subscribe_with_id(&self, id: ListenerId, listener: impl Fn(&T) + 'static) {
        self.insert(id, Rc::new(listener));
    }

    /// Register a listener under a caller-supplied id, then invoke it once
    /// with the current value before returning.
    pub fn subscribe_with_id_and_fire(&self, id: ListenerId, listener: impl Fn(&T) + 'static) {
        self.insert_and_fire(id, Rc::new(listener));
    }

    /// Remove the listener registered under `id`.
    ///
    /// Returns `false` (and does nothing) if no such listener exists.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let entry = {
            let mut state = self.shared.state.borrow_mut();
            let position = state.listeners.iter().position(|entry| entry.id == id);
            position.map(|index| state.listeners.remove(index))
        };
        let removed = entry.is_some();
        if let Some(entry) = entry {
            entry.retire();
        }

        #[cfg(feature = "tracing")]
        debug!(%id, removed, "observable: unsubscribe");

        removed
    }

    /// Register a listener and return a guard that unsubscribes it on drop.
    pub fn observe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = ListenerId::new();
        let live = self.insert(id, Rc::new(listener));
        self.guard(id, live)
    }

    /// Like [`observe`](Self::observe), then invoke the listener once with the
    /// current value before returning.
    pub fn observe_and_fire(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = ListenerId::new();
        let live = self.insert_and_fire(id, Rc::new(listener));
        self.guard(id, live)
    }

    /// Number of assignments so far. Useful for dirty-checking in render
    /// loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.state.borrow().version
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.state.borrow().listeners.len()
    }

    /// Whether a listener is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.shared
            .state
            .borrow()
            .listeners
            .iter()
            .any(|entry| entry.id == id)
    }

    /// Whether a notification cycle is currently running.
    #[must_use]
    pub fn is_notifying(&self) -> bool {
        self.shared.depth.get() > 0
    }

    #[must_use]
    pub fn config(&self) -> ObservableConfig {
        self.shared.config
    }

    /// Register `listener` under `id` and return its liveness flag.
    fn insert(&self, id: ListenerId, listener: Listener<T>) -> Rc<Cell<bool>> {
        let live = Rc::new(Cell::new(true));
        let entry = Entry {
            id,
            listener,
            live: Rc::clone(&live),
        };
        // The replaced entry is dropped after the borrow ends: its closure may
        // own a guard that unsubscribes from this observable.
        let replaced = {
            let mut state = self.shared.state.borrow_mut();
            let replaced = match state.listeners.iter_mut().find(|slot| slot.id == id) {
                Some(slot) => Some(std::mem::replace(slot, entry)),
                None => {
                    state.listeners.push(entry);
                    None
                }
            };

            #[cfg(feature = "tracing")]
            debug!(%id, listeners = state.listeners.len(), "observable: subscribe");

            replaced
        };
        if let Some(old) = replaced {
            old.retire();
        }
        live
    }

    fn insert_and_fire(&self, id: ListenerId, listener: Listener<T>) -> Rc<Cell<bool>> {
        let live = self.insert(id, Rc::clone(&listener));
        let value = self.get();
        listener(&value);
        live
    }

    fn guard(&self, id: ListenerId, live: Rc<Cell<bool>>) -> Subscription {
        let weak: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        Subscription {
            id,
            release: Some(Box::new(move || {
                // Gone already, or replaced by another registration under `id`.
                if !live.get() {
                    return;
                }
                if let Some(shared) = weak.upgrade() {
                    Observable { shared }.unsubscribe(id);
                }
            })),
        }
    }

    /// Run one notification cycle over a snapshot of the listener list.
    ///
    /// The value is re-read whenever a nested assignment has bumped the
    /// version, so each listener is handed what is stored when it runs.
    fn notify(&self) {
        let (listeners, mut version, mut value) = {
            let state = self.shared.state.borrow();
            (state.listeners.clone(), state.version, state.value.clone())
        };
        let depth = DepthGuard::enter(&self.shared.depth);

        #[cfg(feature = "tracing")]
        {
            trace!(
                version,
                listeners = listeners.len(),
                depth = depth.level(),
                "observable: notify"
            );
            if depth.level() > self.shared.config.reentrancy_warn_depth {
                warn!(
                    depth = depth.level(),
                    threshold = self.shared.config.reentrancy_warn_depth,
                    "observable: re-entrant notification nested past threshold"
                );
            }
        }

        for entry in &listeners {
            if !entry.live.get() {
                continue;
            }
            let current = self.version();
            if current != version {
                version = current;
                value = self.get();
            }
            (entry.listener)(&value);
        }

        drop(depth);
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Assign and notify only if `value` differs from the current value.
    ///
    /// Returns whether listeners were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        if self.shared.state.borrow().value == value {
            return false;
        }
        self.set(value);
        true
    }
}

/// Tracks nesting of notification cycles; restores the count even if a
/// listener panics.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    level: usize,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        let level = depth.get() + 1;
        depth.set(level);
        Self { depth, level }
    }

    #[cfg(feature = "tracing")]
    fn level(&self) -> usize {
        self.level
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// RAII guard for a listener registered through
/// [`Observable::observe`] / [`Observable::observe_and_fire`].
///
/// Dropping the `Subscription` unsubscribes the listener. The guard holds
/// only a weak reference, so it never keeps the observable alive; if the
/// observable is gone, dropping the guard does nothing. The guard only ever
/// removes its own listener: once that listener has been unsubscribed or
/// replaced through [`Observable::subscribe_with_id`], dropping it is a no-op.
#[must_use = "dropping a Subscription unsubscribes its listener immediately"]
pub struct Subscription {
    id: ListenerId,
    /// Type-erased unsubscribe action. `None` once detached.
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// The id the listener is registered under.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Give up automatic unsubscription and return the id for manual
    /// [`Observable::unsubscribe`].
    #[must_use]
    pub fn detach(mut self) -> ListenerId {
        self.release = None;
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.release.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
