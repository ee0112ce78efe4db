//! # migrent-table
//!
//! A client-side tabular view engine for admin tables.
//!
//! Given rows of any type and an ordered list of [`Column`] descriptors, a
//! [`Table`] produces the filtered, searched and sorted view to render, and
//! serializes rows to CSV for download. All state lives in a per-instance
//! [`ViewState`]; nothing is shared between tables.
//!
//! ## Example
//!
//! ```rust
//! use migrent_table::{Column, Table, ViewState};
//!
//! struct Payment { id: u32, email: String, status: &'static str }
//!
//! let table = Table::builder("payments")
//!     .identity(|p: &Payment| p.id.to_string())
//!     .column(Column::new("email", "Email", |p: &Payment| Some(p.email.clone())))
//!     .column(Column::new("status", "Status", |p: &Payment| Some(p.status.to_string())))
//!     .build()
//!     .unwrap();
//!
//! let rows = vec![
//!     Payment { id: 1, email: "a@x.com".into(), status: "completed" },
//!     Payment { id: 2, email: "b@x.com".into(), status: "pending" },
//! ];
//!
//! let mut state = ViewState::new();
//! state.set_filter_value("pending");
//! let view = table.compute_view(&rows, &state, Some("email"), Some("status"));
//! assert_eq!(view.len(), 1);
//! ```

pub mod collate;
pub mod column;
pub mod engine;
pub mod error;
pub mod export;
pub mod state;

pub use collate::locale_compare;
pub use column::{Accessor, Cell, Column, Renderer};
pub use engine::{Table, TableBuilder, View, ViewStatus};
pub use error::{ExportError, TableError};
pub use export::{
    CSV_MIME, CsvDocument, CsvDownload, DownloadSink, FileSink, MemorySink, csv_text, export_csv,
};
pub use state::{ALL, SortDirection, ViewState};
