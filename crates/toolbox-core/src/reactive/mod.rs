#![forbid(unsafe_code)]

//! Reactive value bindings.
//!
//! - [`Observable`]: a shared value that notifies keyed listeners on every
//!   assignment.
//! - [`ListenerId`]: the key a listener is registered under, generated or
//!   caller-supplied.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`ObservableConfig`]: tuning knobs, loadable from the environment.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<..>` for single-threaded shared ownership. The
//! listener list is snapshotted before each notification cycle so callbacks
//! run with no interior borrow held.
//!
//! # Invariants
//!
//! 1. Every assignment (`set`, `update`) notifies each registered listener
//!    exactly once, with the assigned value, in registration order.
//! 2. `set_if_changed(v)` with `v == current` is a no-op.
//! 3. `subscribe*` never fires; `subscribe*_and_fire` fires once, before
//!    returning, with the value current at subscription time.
//! 4. A listener removed before or during a cycle is not invoked again.
//! 5. Listener registrations never keep the observable alive.

pub mod config;
pub mod observable;

pub use config::{ConfigError, ConfigParse, ObservableConfig};
pub use observable::{ListenerId, Observable, Subscription};
