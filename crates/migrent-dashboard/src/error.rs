//! Error types for the dashboard crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use migrent_backend::BackendError;
use migrent_table::{ExportError, TableError};
use thiserror::Error;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Failed to start the server.
    #[error("failed to start dashboard: {0}")]
    StartupFailed(String),

    /// The request needs a signed-in session.
    #[error("not signed in")]
    NotSignedIn,

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Table definition rejected at startup.
    #[error("table setup error: {0}")]
    Table(#[from] TableError),

    /// CSV export failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// A backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl DashboardError {
    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::NotSignedIn => StatusCode::UNAUTHORIZED,
            DashboardError::InvalidRequest(_) | DashboardError::Export(_) => {
                StatusCode::BAD_REQUEST
            }
            DashboardError::Backend(err) => match err {
                BackendError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                BackendError::NotFound(_) => StatusCode::NOT_FOUND,
                BackendError::Conflict(_) => StatusCode::CONFLICT,
                BackendError::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
                BackendError::Http { status: 400, .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
            DashboardError::StartupFailed(_) | DashboardError::Table(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Dashboard request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Dashboard request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_mapping() {
        let conflict = DashboardError::from(BackendError::Conflict(
            "You have already reported this.".to_string(),
        ));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.to_string(), "You have already reported this.");

        let transition =
            DashboardError::from(BackendError::InvalidTransition("l6".to_string()));
        assert_eq!(transition.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let upstream = DashboardError::from(BackendError::http(500, "boom"));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_local_status_mapping() {
        assert_eq!(DashboardError::NotSignedIn.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            DashboardError::InvalidRequest("role".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        let setup = DashboardError::from(TableError::MissingIdentity("users".to_string()));
        assert_eq!(setup.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
