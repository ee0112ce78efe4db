//! Content reports: submission by users, moderation by admins.

use crate::error::BackendError;
use crate::hosted::ensure_success;
use async_trait::async_trait;
use migrent_core::{ApiConfig, Report, ReportStatus, ReportSubmission};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Most reports returned by one listing call.
pub const LIST_LIMIT: usize = 100;

/// Signed-in actor on whose behalf a report call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub access_token: String,
    pub user_id: String,
}

impl Caller {
    pub fn new(access_token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: user_id.into(),
        }
    }
}

/// Acknowledgement returned for a new report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub status: String,
    pub message: String,
}

impl SubmitReceipt {
    pub(crate) fn accepted() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Report submitted. Our team will review it shortly.".to_string(),
        }
    }
}

/// Where reports are filed and reviewed.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// File a report. A second pending report from the same caller on the
    /// same item is a [`BackendError::Conflict`].
    async fn submit(
        &self,
        caller: &Caller,
        submission: &ReportSubmission,
    ) -> Result<SubmitReceipt, BackendError>;

    /// Reports in `status`, newest first, at most [`LIST_LIMIT`].
    async fn list(&self, caller: &Caller, status: ReportStatus) -> Result<Vec<Report>, BackendError>;

    /// Record a moderation outcome. Moving back to pending is rejected.
    async fn set_status(
        &self,
        caller: &Caller,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<Report, BackendError>;
}

pub(crate) fn check_outcome(report_id: &str, status: ReportStatus) -> Result<(), BackendError> {
    if status.is_moderation_outcome() {
        Ok(())
    } else {
        Err(BackendError::InvalidTransition(format!(
            "report '{}' cannot be moved back to {}",
            report_id, status
        )))
    }
}

/// The REST API server that owns the reports table.
#[derive(Debug, Clone)]
pub struct ReportsApi {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ReportList {
    reports: Vec<Report>,
}

impl ReportsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, caller: &Caller) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&caller.access_token)
    }
}

#[async_trait]
impl ReportStore for ReportsApi {
    async fn submit(
        &self,
        caller: &Caller,
        submission: &ReportSubmission,
    ) -> Result<SubmitReceipt, BackendError> {
        let response = self
            .request(Method::POST, "/reports", caller)
            .json(submission)
            .send()
            .await?;
        let receipt: SubmitReceipt = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("report receipt: {}", e)))?;
        tracing::info!(
            item_type = submission.item_type.as_str(),
            item_id = %submission.item_id,
            "Report submitted"
        );
        Ok(receipt)
    }

    async fn list(&self, caller: &Caller, status: ReportStatus) -> Result<Vec<Report>, BackendError> {
        let path = format!("/reports?status={}", status.as_str());
        let response = self.request(Method::GET, &path, caller).send().await?;
        let list: ReportList = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("report list: {}", e)))?;
        let mut reports = list.reports;
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports.truncate(LIST_LIMIT);
        Ok(reports)
    }

    async fn set_status(
        &self,
        caller: &Caller,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<Report, BackendError> {
        check_outcome(report_id, status)?;
        let path = format!("/reports/{}", urlencoding::encode(report_id));
        let response = self
            .request(Method::PATCH, &path, caller)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        let report: Report = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("report: {}", e)))?;
        tracing::info!(report_id, status = %status, reviewer = %caller.user_id, "Report reviewed");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_not_an_outcome() {
        assert!(check_outcome("r1", ReportStatus::Dismissed).is_ok());
        assert!(matches!(
            check_outcome("r1", ReportStatus::Pending),
            Err(BackendError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_report_list_parses() {
        let list: ReportList = serde_json::from_str(
            r#"{"reports":[{"id":"r1","reporter_id":"u1","listing_id":"l3",
                "reason":"Scam or fraud","status":"pending",
                "created_at":"2026-02-01T10:00:00Z"}]}"#,
        )
        .unwrap();
        assert_eq!(list.reports.len(), 1);
        assert_eq!(list.reports[0].details, "");
    }

    #[test]
    fn test_base_url_trimmed() {
        let api = ReportsApi::new("http://localhost:8000/");
        assert_eq!(api.url("/reports"), "http://localhost:8000/reports");
    }
}
