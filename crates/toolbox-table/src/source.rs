#![forbid(unsafe_code)]

//! Observable table source and the host trait it drives.
//!
//! # Sync pass
//!
//! Every time the sections are replaced (and once when a host binds), each
//! bound host receives, in order:
//!
//! 1. `register_cells` with the distinct row reuse identifiers, in first-seen
//!    order;
//! 2. `register_supplementary` with the distinct header and footer kinds
//!    (headers first), in first-seen order;
//! 3. `reload_all`.
//!
//! # Failure Modes
//!
//! - **Host re-entry**: a host that replaces the sections from inside one of
//!   its own `TableHost` callbacks panics (the host is mutably borrowed for
//!   the whole pass). Row actions run with no host borrowed and may replace
//!   the sections freely.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use toolbox_core::{ListenerId, Observable, Subscription, UniqueByExt};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::section::{IndexPath, Row, Section};

/// The presentation side of a table: whatever actually owns cells and views.
pub trait TableHost {
    /// Make these row kinds available for dequeueing.
    fn register_cells(&mut self, kinds: &[String]);

    /// Make these header/footer view kinds available for dequeueing.
    fn register_supplementary(&mut self, kinds: &[String]);

    /// Redraw every section.
    fn reload_all(&mut self);

    /// Redraw a single row.
    fn reload_row(&mut self, path: IndexPath);
}

type HostSlot = (ListenerId, Weak<RefCell<dyn TableHost>>);

/// Sections held in an [`Observable`], plus the hosts bound to them.
///
/// Cloning creates a new handle to the **same** sections and host list.
pub struct TableSource<M> {
    sections: Observable<Vec<Section<M>>>,
    hosts: Rc<RefCell<Vec<HostSlot>>>,
}

impl<M> Clone for TableSource<M> {
    fn clone(&self) -> Self {
        Self {
            sections: self.sections.clone(),
            hosts: Rc::clone(&self.hosts),
        }
    }
}

impl<M: fmt::Debug> fmt::Debug for TableSource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSource")
            .field("sections", &self.sections)
            .field("hosts", &self.hosts.borrow().len())
            .finish()
    }
}

impl<M: Clone + 'static> Default for TableSource<M> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<M: Clone + 'static> TableSource<M> {
    #[must_use]
    pub fn new(sections: Vec<Section<M>>) -> Self {
        Self {
            sections: Observable::new(sections),
            hosts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The underlying observable, for callers that want their own listeners.
    #[must_use]
    pub fn observable(&self) -> &Observable<Vec<Section<M>>> {
        &self.sections
    }

    /// Bind a host: run a sync pass now and after every change.
    ///
    /// The host is held weakly. Dropping the returned [`TableBinding`] (or the
    /// host itself) ends the binding.
    pub fn bind<H: TableHost + 'static>(&self, host: &Rc<RefCell<H>>) -> TableBinding {
        let weak: Weak<RefCell<H>> = Rc::downgrade(host);
        let slot: Weak<RefCell<dyn TableHost>> = weak.clone();

        let subscription = self.sections.observe_and_fire(move |sections| {
            if let Some(host) = weak.upgrade() {
                sync_host(&mut *host.borrow_mut(), sections);
            }
        });

        let id = subscription.id();
        self.hosts.borrow_mut().push((id, slot));

        #[cfg(feature = "tracing")]
        debug!(%id, hosts = self.hosts.borrow().len(), "table: bind host");

        TableBinding {
            subscription: Some(subscription),
            hosts: Rc::downgrade(&self.hosts),
        }
    }

    /// Replace all sections and sync every bound host.
    pub fn set_sections(&self, sections: Vec<Section<M>>) {
        self.sections.set(sections);
    }

    /// Edit the sections in place, then sync every bound host.
    pub fn update(&self, f: impl FnOnce(&mut Vec<Section<M>>)) {
        self.sections.update(f);
    }

    /// A copy of the current sections.
    #[must_use]
    pub fn sections(&self) -> Vec<Section<M>> {
        self.sections.get()
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.with(Vec::len)
    }

    /// Rows in `section`, or 0 if there is no such section.
    #[must_use]
    pub fn row_count(&self, section: usize) -> usize {
        self.sections
            .with(|sections| sections.get(section).map_or(0, |s| s.rows().len()))
    }

    #[must_use]
    pub fn row(&self, path: IndexPath) -> Option<Row<M>> {
        self.sections.with(|sections| lookup(sections, path).cloned())
    }

    #[must_use]
    pub fn header_title(&self, section: usize) -> Option<String> {
        self.sections.with(|sections| {
            sections
                .get(section)
                .and_then(Section::header_title)
                .map(str::to_owned)
        })
    }

    #[must_use]
    pub fn footer_title(&self, section: usize) -> Option<String> {
        self.sections.with(|sections| {
            sections
                .get(section)
                .and_then(Section::footer_title)
                .map(str::to_owned)
        })
    }

    /// Whether the row allows editing; `false` for an out-of-range path.
    #[must_use]
    pub fn can_edit(&self, path: IndexPath) -> bool {
        self.sections
            .with(|sections| lookup(sections, path).is_some_and(Row::can_edit))
    }

    /// Run the row's select action. Returns `false` if the path is out of
    /// range or the row has no action.
    pub fn select(&self, path: IndexPath) -> bool {
        // Cloned out so the action may replace the sections.
        self.row(path).is_some_and(|row| row.select())
    }

    /// Run the row's delete action. Returns `false` if the path is out of
    /// range or the row has no action.
    pub fn delete(&self, path: IndexPath) -> bool {
        self.row(path).is_some_and(|row| row.delete())
    }

    /// Ask every live bound host to redraw one row.
    ///
    /// Returns `false` (and notifies nobody) if the path is out of range.
    pub fn reload_row(&self, path: IndexPath) -> bool {
        if self.sections.with(|sections| lookup(sections, path).is_none()) {
            return false;
        }

        let hosts: Vec<Rc<RefCell<dyn TableHost>>> = {
            let mut slots = self.hosts.borrow_mut();
            slots.retain(|(_, host)| host.strong_count() > 0);
            slots.iter().filter_map(|(_, host)| host.upgrade()).collect()
        };

        #[cfg(feature = "tracing")]
        debug!(%path, hosts = hosts.len(), "table: reload row");

        for host in hosts {
            host.borrow_mut().reload_row(path);
        }
        true
    }

    /// Number of bound hosts still alive.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts
            .borrow()
            .iter()
            .filter(|(_, host)| host.strong_count() > 0)
            .count()
    }
}

fn lookup<M>(sections: &[Section<M>], path: IndexPath) -> Option<&Row<M>> {
    sections.get(path.section)?.rows().get(path.row)
}

/// One sync pass; see the module docs for the call order.
fn sync_host<M>(host: &mut dyn TableHost, sections: &[Section<M>]) {
    let cells: Vec<String> = sections
        .iter()
        .flat_map(Section::rows)
        .map(Row::reuse_identifier)
        .unique_by(|kind| *kind)
        .map(str::to_owned)
        .collect();

    let supplementary: Vec<String> = sections
        .iter()
        .filter_map(Section::header_kind)
        .chain(sections.iter().filter_map(Section::footer_kind))
        .unique_by(|kind| *kind)
        .map(str::to_owned)
        .collect();

    #[cfg(feature = "tracing")]
    debug!(
        sections = sections.len(),
        cells = cells.len(),
        supplementary = supplementary.len(),
        "table: sync host"
    );

    host.register_cells(&cells);
    host.register_supplementary(&supplementary);
    host.reload_all();
}

/// Keeps a host bound to a [`TableSource`]. Dropping it unbinds the host.
#[must_use = "dropping a TableBinding unbinds the host immediately"]
pub struct TableBinding {
    subscription: Option<Subscription>,
    hosts: Weak<RefCell<Vec<HostSlot>>>,
}

impl TableBinding {
    #[must_use]
    pub fn id(&self) -> Option<ListenerId> {
        self.subscription.as_ref().map(Subscription::id)
    }
}

impl Drop for TableBinding {
    fn drop(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };
        let id = subscription.id();
        drop(subscription);
        if let Some(hosts) = self.hosts.upgrade() {
            hosts.borrow_mut().retain(|(slot, _)| *slot != id);
        }
    }
}

impl fmt::Debug for TableBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBinding")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}
