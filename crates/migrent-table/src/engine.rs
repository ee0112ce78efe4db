//! Table definitions and the view pipeline.
//!
//! [`Table::compute_view`] turns a slice of rows into the ordered sequence
//! to display:
//!
//! 1. search: keep rows whose value at the search key contains the search
//!    text, compared case-insensitively
//! 2. filter: keep rows whose value at the filter key equals the filter
//!    value exactly
//! 3. sort: stable sort by the sort column in locale order, reversed for
//!    descending
//!
//! Each stage is skipped when its key is not given or its state is
//! inactive. The input slice is never touched; the view borrows from it.

use crate::collate::locale_compare;
use crate::column::{Accessor, Column};
use crate::error::TableError;
use crate::export::CsvDocument;
use crate::state::ViewState;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Extracts the stable identity of a row, used as its rendering key.
pub type IdentityFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Builder for [`Table`].
pub struct TableBuilder<T> {
    name: String,
    columns: Vec<Column<T>>,
    fields: Vec<(String, Accessor<T>)>,
    identity: Option<IdentityFn<T>>,
}

impl<T> TableBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            fields: Vec::new(),
            identity: None,
        }
    }

    /// Append a displayed column. Columns render in the order added.
    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    /// Register an addressable field that is not displayed, e.g. an id
    /// used only for search.
    pub fn field<F>(mut self, key: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.fields.push((key.into(), Arc::new(accessor)));
        self
    }

    /// Stable identity of a row. Required.
    pub fn identity<F>(mut self, identity: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.identity = Some(Arc::new(identity));
        self
    }

    pub fn build(self) -> Result<Table<T>, TableError> {
        let identity = self
            .identity
            .ok_or_else(|| TableError::MissingIdentity(self.name.clone()))?;

        if self.columns.is_empty() {
            return Err(TableError::NoColumns(self.name));
        }

        let mut seen = HashSet::new();
        let keys = self
            .columns
            .iter()
            .map(|c| c.key())
            .chain(self.fields.iter().map(|(k, _)| k.as_str()));
        for key in keys {
            if !seen.insert(key) {
                return Err(TableError::DuplicateColumn(key.to_string()));
            }
        }

        Ok(Table {
            name: self.name,
            columns: self.columns,
            fields: self.fields,
            identity,
        })
    }
}

/// A described table: ordered columns, extra fields, row identity.
pub struct Table<T> {
    name: String,
    columns: Vec<Column<T>>,
    fields: Vec<(String, Accessor<T>)>,
    identity: IdentityFn<T>,
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("fields", &self.fields.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Table<T> {
    pub fn builder(name: impl Into<String>) -> TableBuilder<T> {
        TableBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key() == key)
    }

    /// Rendering key of a row.
    pub fn row_key(&self, row: &T) -> String {
        (self.identity)(row)
    }

    /// String value of `key` on `row`. Unknown keys read as "".
    pub fn value(&self, key: &str, row: &T) -> String {
        if let Some(column) = self.column(key) {
            return column.value(row);
        }
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, accessor)| accessor(row))
            .unwrap_or_default()
    }

    /// Apply a header click to `state`.
    ///
    /// Returns false, leaving `state` untouched, when `key` names no column
    /// or a column that is not sortable.
    pub fn toggle_sort(&self, state: &mut ViewState, key: &str) -> bool {
        match self.column(key) {
            Some(column) if column.is_sortable() => {
                state.apply_toggle(key);
                true
            }
            _ => false,
        }
    }

    /// The state a click on `key` would produce, for building header links.
    pub fn toggled(&self, state: &ViewState, key: &str) -> ViewState {
        let mut next = state.clone();
        self.toggle_sort(&mut next, key);
        next
    }

    /// Run the search, filter and sort pipeline over `rows`.
    pub fn compute_view<'a>(
        &self,
        rows: &'a [T],
        state: &ViewState,
        search_key: Option<&str>,
        filter_key: Option<&str>,
    ) -> View<'a, T> {
        let mut shown: Vec<&'a T> = rows.iter().collect();

        if let Some(key) = search_key
            && !state.search_text.is_empty()
        {
            let needle = state.search_text.to_lowercase();
            shown.retain(|row| self.value(key, row).to_lowercase().contains(&needle));
        }

        if let Some(key) = filter_key
            && state.is_filtering()
        {
            shown.retain(|row| self.value(key, row) == state.filter_value);
        }

        if let Some(key) = state.sort_key.as_deref() {
            match self.column(key) {
                Some(column) if column.is_sortable() => {
                    let mut keyed: Vec<(String, &'a T)> =
                        shown.into_iter().map(|row| (column.value(row), row)).collect();
                    let descending = state.sort_direction == crate::SortDirection::Descending;
                    // sort_by is stable, so equal keys keep input order either way.
                    keyed.sort_by(|(a, _), (b, _)| {
                        if descending {
                            locale_compare(b, a)
                        } else {
                            locale_compare(a, b)
                        }
                    });
                    shown = keyed.into_iter().map(|(_, row)| row).collect();
                }
                _ => {
                    tracing::debug!(table = %self.name, sort_key = key, "Ignoring stale sort key");
                }
            }
        }

        tracing::debug!(
            table = %self.name,
            total = rows.len(),
            shown = shown.len(),
            "Computed table view"
        );

        View {
            rows: shown,
            total: rows.len(),
        }
    }

    /// CSV document with one column per displayed column that carries a
    /// value, headed by the column labels.
    pub fn to_csv<'a, I>(&self, rows: I) -> CsvDocument
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let columns: Vec<&Column<T>> = self.columns.iter().filter(|c| c.has_value()).collect();
        let headers = columns.iter().map(|c| c.label().to_string()).collect();
        let records = rows
            .into_iter()
            .map(|row| columns.iter().map(|c| c.value(row)).collect())
            .collect();
        CsvDocument::new(headers, records)
    }
}

/// Whether a table has something to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// Rows have not arrived yet.
    Loading,
    /// Rows arrived but none survived search and filter.
    Empty,
    /// At least one row to display.
    Ready,
}

impl ViewStatus {
    /// Status of an optional view; `None` means the data is still loading.
    pub fn of<T>(view: Option<&View<'_, T>>) -> Self {
        match view {
            None => ViewStatus::Loading,
            Some(view) => view.status(),
        }
    }
}

/// The ordered rows to display, borrowed from the caller's slice.
#[derive(Debug)]
pub struct View<'a, T> {
    rows: Vec<&'a T>,
    total: usize,
}

impl<'a, T> View<'a, T> {
    pub fn rows(&self) -> &[&'a T] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.rows.iter().copied()
    }

    /// Rows shown.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows before search and filter.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn status(&self) -> ViewStatus {
        if self.rows.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortDirection;

    #[derive(Debug, PartialEq)]
    struct User {
        id: u32,
        email: String,
        role: &'static str,
    }

    fn user(id: u32, email: &str, role: &'static str) -> User {
        User {
            id,
            email: email.to_string(),
            role,
        }
    }

    fn table() -> Table<User> {
        Table::builder("users")
            .identity(|u: &User| u.id.to_string())
            .column(Column::new("email", "Email", |u: &User| Some(u.email.clone())))
            .column(Column::new("role", "Role", |u: &User| Some(u.role.to_string())))
            .column(
                Column::new("id", "Id", |u: &User| Some(u.id.to_string())).sortable(false),
            )
            .build()
            .unwrap()
    }

    fn ids(view: &View<'_, User>) -> Vec<u32> {
        view.iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_build_requires_identity() {
        let err = Table::<User>::builder("users")
            .column(Column::new("email", "Email", |u: &User| Some(u.email.clone())))
            .build()
            .unwrap_err();
        assert_eq!(err, TableError::MissingIdentity("users".to_string()));
    }

    #[test]
    fn test_build_rejects_duplicate_keys() {
        let err = Table::<User>::builder("users")
            .identity(|u: &User| u.id.to_string())
            .column(Column::new("email", "Email", |u: &User| Some(u.email.clone())))
            .field("email", |u: &User| Some(u.email.clone()))
            .build()
            .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("email".to_string()));
    }

    #[test]
    fn test_build_rejects_no_columns() {
        let err = Table::<User>::builder("empty")
            .identity(|u: &User| u.id.to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, TableError::NoColumns(_)));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let rows = vec![user(1, "Alice@Gmail.com", "seeker"), user(2, "bob@x.com", "owner")];
        let mut state = ViewState::new();
        state.set_search_text("GMAIL");
        let view = table().compute_view(&rows, &state, Some("email"), None);
        assert_eq!(ids(&view), vec![1]);
        assert_eq!(view.total(), 2);
    }

    #[test]
    fn test_filter_is_exact_and_case_sensitive() {
        let rows = vec![user(1, "a@x.com", "owner"), user(2, "b@x.com", "Owner")];
        let mut state = ViewState::new();
        state.set_filter_value("owner");
        let view = table().compute_view(&rows, &state, None, Some("role"));
        assert_eq!(ids(&view), vec![1]);
    }

    #[test]
    fn test_missing_keys_skip_stages() {
        let rows = vec![user(1, "a@x.com", "owner"), user(2, "b@x.com", "seeker")];
        let mut state = ViewState::new();
        state.set_search_text("zzz");
        state.set_filter_value("nobody");
        let view = table().compute_view(&rows, &state, None, None);
        assert_eq!(ids(&view), vec![1, 2]);
    }

    #[test]
    fn test_unknown_search_key_reads_empty() {
        let rows = vec![user(1, "a@x.com", "owner")];
        let mut state = ViewState::new();
        state.set_search_text("a");
        let view = table().compute_view(&rows, &state, Some("phone"), None);
        assert!(view.is_empty());
        assert_eq!(view.status(), ViewStatus::Empty);
    }

    #[test]
    fn test_hidden_field_is_searchable() {
        let table = Table::builder("users")
            .identity(|u: &User| u.id.to_string())
            .column(Column::new("email", "Email", |u: &User| Some(u.email.clone())))
            .field("role", |u: &User| Some(u.role.to_string()))
            .build()
            .unwrap();
        let rows = vec![user(1, "a@x.com", "owner"), user(2, "b@x.com", "seeker")];
        let mut state = ViewState::new();
        state.set_filter_value("seeker");
        let view = table.compute_view(&rows, &state, None, Some("role"));
        assert_eq!(ids(&view), vec![2]);
    }

    #[test]
    fn test_toggle_sort_rejects_unsortable_and_unknown() {
        let table = table();
        let mut state = ViewState::new();
        assert!(!table.toggle_sort(&mut state, "id"));
        assert!(!table.toggle_sort(&mut state, "nope"));
        assert_eq!(state, ViewState::new());
    }

    #[test]
    fn test_stale_sort_key_keeps_order() {
        let rows = vec![user(1, "b@x.com", "owner"), user(2, "a@x.com", "seeker")];
        let state = ViewState {
            sort_key: Some("removed".to_string()),
            sort_direction: SortDirection::Descending,
            ..ViewState::default()
        };
        let view = table().compute_view(&rows, &state, None, None);
        assert_eq!(ids(&view), vec![1, 2]);
    }

    #[test]
    fn test_toggled_builds_next_state_without_mutating() {
        let table = table();
        let state = ViewState::new();
        let next = table.toggled(&state, "email");
        assert_eq!(state.sort_key, None);
        assert_eq!(next.sort_key.as_deref(), Some("email"));
        let after = table.toggled(&next, "email");
        assert_eq!(after.sort_direction, SortDirection::Descending);
    }

    #[test]
    fn test_view_status_loading() {
        assert_eq!(ViewStatus::of::<User>(None), ViewStatus::Loading);
        let rows = vec![user(1, "a@x.com", "owner")];
        let view = table().compute_view(&rows, &ViewState::new(), None, None);
        assert_eq!(ViewStatus::of(Some(&view)), ViewStatus::Ready);
    }

    #[test]
    fn test_to_csv_uses_labels_and_values() {
        let table = Table::builder("users")
            .identity(|u: &User| u.id.to_string())
            .column(Column::new("email", "Email", |u: &User| Some(u.email.clone())))
            .column(Column::rendered("actions", "Actions", |_: &User| {
                crate::Cell::markup("<button>x</button>")
            }))
            .build()
            .unwrap();
        let rows = vec![user(1, "a@x.com", "owner")];
        let doc = table.to_csv(&rows);
        assert_eq!(doc.text(), "Email\na@x.com");
    }
}
