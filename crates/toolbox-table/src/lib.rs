#![forbid(unsafe_code)]

//! Headless sectioned table sources.
//!
//! # Role in ToolBox
//! `toolbox-table` is the data side of a grouped list view: sections with
//! optional header/footer titles, rows tagged with a reuse identifier, and
//! select/delete actions. It owns no views. A presentation host implements
//! [`TableHost`] and is told which cell kinds to register and when to reload.
//!
//! # How it fits in the system
//! [`TableSource`] keeps its sections in a `toolbox_core::Observable`, so
//! replacing the sections re-registers kinds and reloads every bound host in
//! one synchronous pass. Index lookups are bounds-checked: an out-of-range
//! [`IndexPath`] yields `None`/`0`/`false`, never a panic.

pub mod section;
pub mod source;

pub use section::{IndexPath, Row, Section};
pub use source::{TableBinding, TableHost, TableSource};
