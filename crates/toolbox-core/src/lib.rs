#![forbid(unsafe_code)]

//! Core: observable values, loadable state, and small collection helpers.
//!
//! # Role in ToolBox
//! `toolbox-core` holds the only pieces of the toolkit with real semantics.
//! Presentation adapters (`toolbox-table`, or a UI layer of your own) consume
//! these types and never reach into their internals.
//!
//! # Primary responsibilities
//! - **Observable**: a shared value that synchronously notifies keyed
//!   listeners on every assignment.
//! - **Subscription**: RAII guard that removes its listener on drop.
//! - **Loadable**: the not-started / in-progress / succeeded / failed sum type
//!   and the precedence-based combinators over it.
//! - **Collection helpers**: order-preserving de-duplication.
//!
//! # How it fits in the system
//! A presentation host typically owns an `Observable<Loadable<T, E>>`, calls
//! `observe_and_fire` once, and renders from `value()` / `error()` /
//! `is_in_progress()` in the callback. Producers push successive `Loadable`
//! states into the observable from the same thread.

pub mod collection;
pub mod loadable;
pub mod logging;
pub mod reactive;

pub use collection::UniqueByExt;
pub use loadable::{Combine, LoadStatus, Loadable, combine_all, combine2, combine3, combine4};
pub use reactive::{ListenerId, Observable, ObservableConfig, Subscription};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
