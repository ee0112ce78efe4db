//! Column descriptors.
//!
//! A column pairs a key and a header label with an explicit accessor that
//! reads the column's value out of a row. The accessor is the only way the
//! engine looks inside a row, so any row shape works without reflection.

use std::fmt;
use std::sync::Arc;

/// Reads one field of a row. `None` means the row has no value there.
pub type Accessor<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Produces the display form of a cell, overriding the accessor value.
pub type Renderer<T> = Arc<dyn Fn(&T) -> Cell + Send + Sync>;

/// Display form of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Plain text, escaped by whoever renders it.
    Text(String),
    /// Pre-rendered markup, trusted as is.
    Markup(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn markup(value: impl Into<String>) -> Self {
        Cell::Markup(value.into())
    }

    /// The raw string inside the cell.
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Text(s) | Cell::Markup(s) => s,
        }
    }
}

/// Describes how to label, read, render and sort one field across rows.
pub struct Column<T> {
    key: String,
    label: String,
    accessor: Option<Accessor<T>>,
    render: Option<Renderer<T>>,
    sortable: bool,
}

impl<T> Column<T> {
    /// A column whose value is read with `accessor`.
    pub fn new<F>(key: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            label: label.into(),
            accessor: Some(Arc::new(accessor)),
            render: None,
            sortable: true,
        }
    }

    /// A display-only column: no addressable value, only a renderer.
    ///
    /// Searching, filtering or sorting on it sees an empty string.
    pub fn rendered<R>(key: impl Into<String>, label: impl Into<String>, render: R) -> Self
    where
        R: Fn(&T) -> Cell + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            label: label.into(),
            accessor: None,
            render: Some(Arc::new(render)),
            sortable: true,
        }
    }

    /// Override the display form of the cell.
    pub fn render<R>(mut self, render: R) -> Self
    where
        R: Fn(&T) -> Cell + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// False for display-only columns built with [`Column::rendered`].
    pub fn has_value(&self) -> bool {
        self.accessor.is_some()
    }

    /// String form of the column's value; absent values read as "".
    pub fn value(&self, row: &T) -> String {
        self.accessor
            .as_ref()
            .and_then(|accessor| accessor(row))
            .unwrap_or_default()
    }

    /// Display form of the cell.
    pub fn cell(&self, row: &T) -> Cell {
        match &self.render {
            Some(render) => render(row),
            None => Cell::Text(self.value(row)),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            accessor: self.accessor.clone(),
            render: self.render.clone(),
            sortable: self.sortable,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("custom_render", &self.render.is_some())
            .finish()
    }
}
