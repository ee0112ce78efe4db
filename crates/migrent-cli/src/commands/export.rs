//! `migrent export`: write a full admin table to a CSV file.

use crate::ExportTable;
use anyhow::Result;
use migrent_backend::Backend;
use migrent_core::MigrentConfig;
use migrent_dashboard::tables::{LISTINGS_CSV, PAYMENTS_CSV, Tables, USERS_CSV};
use migrent_table::{FileSink, export_csv};
use std::path::{Path, PathBuf};

pub async fn run(
    config: &MigrentConfig,
    table: ExportTable,
    out: &Path,
    token: Option<&str>,
) -> Result<()> {
    let backend = Backend::from_config(config)?;
    let (path, rows) = write(config, &backend, table, out, token).await?;
    println!("✔ Exported {} rows to {}", rows, path.display());
    Ok(())
}

async fn write(
    config: &MigrentConfig,
    backend: &Backend,
    table: ExportTable,
    out: &Path,
    token: Option<&str>,
) -> Result<(PathBuf, usize)> {
    let tables = Tables::new(&config.dashboard.base_path)?;
    let repo = backend.repository(token);
    let mut sink = FileSink::new(out);

    let (filename, document) = match table {
        ExportTable::Users => (USERS_CSV, tables.user_export.to_csv(&repo.users().await?)),
        ExportTable::Listings => (
            LISTINGS_CSV,
            tables.listing_export.to_csv(&repo.listings().await?),
        ),
        ExportTable::Payments => (
            PAYMENTS_CSV,
            tables.payment_export.to_csv(&repo.payments().await?),
        ),
    };
    let rows = document.rows.len();
    let path = export_csv(&mut sink, filename, &document)?;
    Ok((path, rows))
}
