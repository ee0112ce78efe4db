//! CSV export.
//!
//! Text generation is pure ([`csv_text`], [`CsvDocument::text`]); delivering
//! the file is a separate side effect behind [`DownloadSink`].
//!
//! Format: one line per record, fields joined by `,`, lines joined by `\n`,
//! header line first. Fields are written verbatim with no quoting, so a
//! field containing a comma or newline shifts the columns of its line.

use crate::error::ExportError;
use std::fs;
use std::path::{Path, PathBuf};

/// Content type of a CSV download.
pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

/// Join headers and records into CSV text.
pub fn csv_text<H, R>(headers: &[H], rows: &[R]) -> String
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join(headers.iter().map(AsRef::as_ref)));
    for row in rows {
        lines.push(join(row.as_ref().iter().map(String::as_str)));
    }
    lines.join("\n")
}

fn join<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields.collect::<Vec<_>>().join(",")
}

/// Headers plus records, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvDocument {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn text(&self) -> String {
        csv_text(&self.headers, &self.rows)
    }
}

/// A finished CSV file waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDownload {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

/// Where a CSV download ends up: a browser response, a directory, a buffer.
pub trait DownloadSink {
    type Output;

    fn deliver(&mut self, download: CsvDownload) -> Result<Self::Output, ExportError>;
}

/// Serialize `document` and hand it to `sink` under `filename`.
pub fn export_csv<S: DownloadSink>(
    sink: &mut S,
    filename: &str,
    document: &CsvDocument,
) -> Result<S::Output, ExportError> {
    validate_filename(filename)?;
    let download = CsvDownload {
        filename: filename.to_string(),
        mime: CSV_MIME,
        content: document.text(),
    };
    tracing::debug!(
        filename = %download.filename,
        rows = document.rows.len(),
        "Exporting CSV"
    );
    sink.deliver(download)
}

fn validate_filename(filename: &str) -> Result<(), ExportError> {
    let invalid = filename.trim().is_empty()
        || filename.contains(['/', '\\'])
        || filename == "."
        || filename == "..";
    if invalid {
        return Err(ExportError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Writes downloads into a directory, one file per download.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl DownloadSink for FileSink {
    type Output = PathBuf;

    fn deliver(&mut self, download: CsvDownload) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&download.filename);
        fs::write(&path, download.content)?;
        tracing::info!(path = %path.display(), "Wrote CSV export");
        Ok(path)
    }
}

/// Keeps downloads in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub downloads: Vec<CsvDownload>,
}

impl DownloadSink for MemorySink {
    type Output = ();

    fn deliver(&mut self, download: CsvDownload) -> Result<(), ExportError> {
        self.downloads.push(download);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> CsvDocument {
        CsvDocument::new(
            vec!["Email".into(), "Amount".into()],
            vec![
                vec!["a@x.com".into(), "49".into()],
                vec!["b@x.com".into(), "29".into()],
            ],
        )
    }

    #[test]
    fn test_header_line_first() {
        let text = doc().text();
        assert_eq!(text.lines().next(), Some("Email,Amount"));
        assert_eq!(text, "Email,Amount\na@x.com,49\nb@x.com,29");
    }

    #[test]
    fn test_no_rows_is_header_only() {
        let text = csv_text(&["Email", "Role"], &Vec::<Vec<String>>::new());
        assert_eq!(text, "Email,Role");
    }

    #[test]
    fn test_commas_are_not_escaped() {
        let text = csv_text(&["Title"], &[vec!["Room, Parramatta".to_string()]]);
        assert_eq!(text, "Title\nRoom, Parramatta");
    }

    #[test]
    fn test_memory_sink_receives_mime_and_name() {
        let mut sink = MemorySink::default();
        export_csv(&mut sink, "migrent-payments.csv", &doc()).unwrap();
        let download = &sink.downloads[0];
        assert_eq!(download.filename, "migrent-payments.csv");
        assert_eq!(download.mime, "text/csv;charset=utf-8;");
    }

    #[test]
    fn test_file_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("out"));
        let path = export_csv(&mut sink, "migrent-users.csv", &doc()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), doc().text());
    }

    #[test]
    fn test_path_like_filenames_rejected() {
        let mut sink = MemorySink::default();
        for name in ["", "../x.csv", "a/b.csv", ".."] {
            assert!(matches!(
                export_csv(&mut sink, name, &doc()),
                Err(ExportError::InvalidFilename(_))
            ));
        }
        assert!(sink.downloads.is_empty());
    }
}
