#![forbid(unsafe_code)]

//! ToolBox public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub use toolbox_core;
#[cfg(feature = "table")]
pub use toolbox_table;

pub mod prelude {
    pub use toolbox_core::{
        Combine, LoadStatus, Loadable, ListenerId, Observable, ObservableConfig, Subscription,
        UniqueByExt, combine_all, combine2, combine3, combine4,
    };

    #[cfg(feature = "table")]
    pub use toolbox_table::{IndexPath, Row, Section, TableBinding, TableHost, TableSource};
}
