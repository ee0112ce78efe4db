//! Per-instance view state: search text, category filter, sort.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Filter value that disables category filtering.
pub const ALL: &str = "all";

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search, filter and sort settings of one table instance.
///
/// Field names on the wire are the short query-string keys `q`, `filter`,
/// `sort` and `dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(rename = "q", default)]
    pub search_text: String,

    #[serde(rename = "filter", default = "default_filter", deserialize_with = "filter_or_all")]
    pub filter_value: String,

    #[serde(
        rename = "sort",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub sort_key: Option<String>,

    #[serde(rename = "dir", default, deserialize_with = "lenient_direction")]
    pub sort_direction: SortDirection,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            filter_value: default_filter(),
            sort_key: None,
            sort_direction: SortDirection::Ascending,
        }
    }
}

fn default_filter() -> String {
    ALL.to_string()
}

// Deserialization never rejects a value: a blank field means unset and an
// unknown direction sorts ascending.

fn filter_or_all<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(if value.is_empty() { default_filter() } else { value })
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|v| !v.is_empty()))
}

fn lenient_direction<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SortDirection, D::Error> {
    Ok(match Option::<String>::deserialize(deserializer)?.as_deref() {
        Some("desc") => SortDirection::Descending,
        _ => SortDirection::Ascending,
    })
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the search text. Empty disables search filtering.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Replace the filter value. [`ALL`] disables category filtering.
    pub fn set_filter_value(&mut self, value: impl Into<String>) {
        self.filter_value = value.into();
    }

    pub fn is_filtering(&self) -> bool {
        self.filter_value != ALL
    }

    /// Sort by `key`, or flip the direction when already sorting by it.
    ///
    /// Callers with a column list go through
    /// [`Table::toggle_sort`](crate::Table::toggle_sort), which refuses
    /// unknown and non-sortable columns first.
    pub(crate) fn apply_toggle(&mut self, key: &str) {
        if self.sort_key.as_deref() == Some(key) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = Some(key.to_string());
            self.sort_direction = SortDirection::Ascending;
        }
    }
}
