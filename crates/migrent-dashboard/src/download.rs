//! CSV downloads as HTTP responses.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use migrent_table::{CsvDownload, DownloadSink, ExportError};

/// Delivers a download as an attachment response.
#[derive(Debug, Default)]
pub struct ResponseSink;

impl DownloadSink for ResponseSink {
    type Output = Response;

    fn deliver(&mut self, download: CsvDownload) -> Result<Response, ExportError> {
        let disposition = format!("attachment; filename=\"{}\"", download.filename);
        Ok((
            [
                (header::CONTENT_TYPE, download.mime.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            download.content,
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrent_table::{CSV_MIME, CsvDocument, export_csv};

    #[test]
    fn test_response_headers() {
        let doc = CsvDocument::new(vec!["Email".into()], vec![vec!["a@x.com".into()]]);
        let response = export_csv(&mut ResponseSink, "migrent-users.csv", &doc).unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], CSV_MIME);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"migrent-users.csv\""
        );
    }
}
