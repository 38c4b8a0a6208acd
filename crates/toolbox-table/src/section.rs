#![forbid(unsafe_code)]

//! Section and row descriptions.

use std::fmt;
use std::rc::Rc;

type Action = Rc<dyn Fn()>;

/// Position of a row: section index, then row index within the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    #[must_use]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.section, self.row)
    }
}

/// One row: a model plus the cell kind that renders it.
///
/// Cloning is cheap for the actions (shared `Rc`) and clones the model.
#[derive(Clone)]
pub struct Row<M> {
    reuse_identifier: String,
    model: M,
    can_edit: bool,
    on_select: Option<Action>,
    on_delete: Option<Action>,
}

impl<M> Row<M> {
    #[must_use]
    pub fn new(reuse_identifier: impl Into<String>, model: M) -> Self {
        Self {
            reuse_identifier: reuse_identifier.into(),
            model,
            can_edit: false,
            on_select: None,
            on_delete: None,
        }
    }

    /// Whether the host should offer editing (swipe-to-delete) on this row.
    #[must_use]
    pub fn editable(mut self, can_edit: bool) -> Self {
        self.can_edit = can_edit;
        self
    }

    #[must_use]
    pub fn on_select(mut self, action: impl Fn() + 'static) -> Self {
        self.on_select = Some(Rc::new(action));
        self
    }

    #[must_use]
    pub fn on_delete(mut self, action: impl Fn() + 'static) -> Self {
        self.on_delete = Some(Rc::new(action));
        self
    }

    #[must_use]
    pub fn reuse_identifier(&self) -> &str {
        &self.reuse_identifier
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    /// Run the select action. Returns `false` if the row has none.
    pub fn select(&self) -> bool {
        run(self.on_select.as_ref())
    }

    /// Run the delete action. Returns `false` if the row has none.
    pub fn delete(&self) -> bool {
        run(self.on_delete.as_ref())
    }
}

fn run(action: Option<&Action>) -> bool {
    match action {
        Some(action) => {
            action();
            true
        }
        None => false,
    }
}

impl<M: fmt::Debug> fmt::Debug for Row<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("reuse_identifier", &self.reuse_identifier)
            .field("model", &self.model)
            .field("can_edit", &self.can_edit)
            .field("on_select", &self.on_select.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

/// A group of rows with optional header/footer.
///
/// Header and footer can each be a plain title, a custom view kind
/// (reuse identifier registered with the host), or both.
#[derive(Debug, Clone)]
pub struct Section<M> {
    header_title: Option<String>,
    footer_title: Option<String>,
    header_kind: Option<String>,
    footer_kind: Option<String>,
    rows: Vec<Row<M>>,
}

impl<M> Default for Section<M> {
    fn default() -> Self {
        Self {
            header_title: None,
            footer_title: None,
            header_kind: None,
            footer_kind: None,
            rows: Vec::new(),
        }
    }
}

impl<M> Section<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rows(mut self, rows: impl IntoIterator<Item = Row<M>>) -> Self {
        self.rows.extend(rows);
        self
    }

    #[must_use]
    pub fn with_header_title(mut self, title: impl Into<String>) -> Self {
        self.header_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_footer_title(mut self, title: impl Into<String>) -> Self {
        self.footer_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_header_kind(mut self, kind: impl Into<String>) -> Self {
        self.header_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_footer_kind(mut self, kind: impl Into<String>) -> Self {
        self.footer_kind = Some(kind.into());
        self
    }

    pub fn push_row(&mut self, row: Row<M>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn header_title(&self) -> Option<&str> {
        self.header_title.as_deref()
    }

    #[must_use]
    pub fn footer_title(&self) -> Option<&str> {
        self.footer_title.as_deref()
    }

    #[must_use]
    pub fn header_kind(&self) -> Option<&str> {
        self.header_kind.as_deref()
    }

    #[must_use]
    pub fn footer_kind(&self) -> Option<&str> {
        self.footer_kind.as_deref()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row<M>] {
        &self.rows
    }
}
