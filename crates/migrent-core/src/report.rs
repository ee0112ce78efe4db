//! Content reports for listings and profiles.
//!
//! A report is drafted by any signed-in user ([`ReportDraft`]), submitted to
//! the report API as a [`ReportSubmission`], and later moderated by a
//! superadmin who moves it out of [`ReportStatus::Pending`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reason that requires free text from the reporter.
pub const OTHER_REASON: &str = "Other";

/// Maximum length of the free-text reason.
pub const MAX_OTHER_TEXT: usize = 500;

/// Maximum length of the optional details message.
pub const MAX_DETAILS: usize = 2000;

const LISTING_REASONS: &[&str] = &[
    "Inaccurate listing information",
    "Suspected scam or fraud",
    "Inappropriate or offensive content",
    "Discriminatory language",
    "Duplicate listing",
    "Listing no longer available",
    "Safety concern",
    OTHER_REASON,
];

const PROFILE_REASONS: &[&str] = &[
    "Fake or misleading profile",
    "Suspected scam or fraud",
    "Inappropriate or offensive content",
    "Harassment or threatening behavior",
    "Discriminatory language",
    "Impersonation",
    "Safety concern",
    OTHER_REASON,
];

/// What is being reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportItemType {
    #[default]
    Listing,
    Profile,
}

impl ReportItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportItemType::Listing => "listing",
            ReportItemType::Profile => "profile",
        }
    }

    /// Reasons offered for this kind of item, "Other" last.
    pub fn reasons(&self) -> &'static [&'static str] {
        match self {
            ReportItemType::Listing => LISTING_REASONS,
            ReportItemType::Profile => PROFILE_REASONS,
        }
    }
}

impl FromStr for ReportItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "listing" => Ok(ReportItemType::Listing),
            "profile" => Ok(ReportItemType::Profile),
            other => Err(format!("unknown report item type '{}'", other)),
        }
    }
}

/// Body of `POST /reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub item_type: ReportItemType,
    pub item_id: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Moderation status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Actioned,
    Dismissed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Pending,
        ReportStatus::Reviewed,
        ReportStatus::Actioned,
        ReportStatus::Dismissed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Actioned => "actioned",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    /// Whether a moderator may set this status. Nothing moves back to pending.
    pub fn is_moderation_outcome(&self) -> bool {
        !matches!(self, ReportStatus::Pending)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown report status '{}'", s))
    }
}

/// A stored report as returned by `GET /reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub listing_id: String,
    #[serde(default)]
    pub item_type: ReportItemType,
    pub reason: String,
    #[serde(default)]
    pub details: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
}

/// Validation failures of a report draft, worded for the reporter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Please select a reason.")]
    MissingReason,

    #[error("Please describe the issue.")]
    MissingOtherText,

    #[error("'{0}' is not a reason for this item")]
    UnknownReason(String),

    #[error("Nothing to report: missing item id.")]
    MissingItemId,
}

/// Staged report form: pick a reason, optionally describe, submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    item_type: ReportItemType,
    item_id: String,
    reason: Option<String>,
    other_text: String,
    details: String,
}

impl ReportDraft {
    pub fn new(item_type: ReportItemType, item_id: impl Into<String>) -> Self {
        Self {
            item_type,
            item_id: item_id.into(),
            reason: None,
            other_text: String::new(),
            details: String::new(),
        }
    }

    pub fn item_type(&self) -> ReportItemType {
        self.item_type
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn other_text(&self) -> &str {
        &self.other_text
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    /// Select one of the offered reasons. Leaving "Other" clears its text.
    pub fn select_reason(&mut self, reason: &str) -> Result<(), DraftError> {
        if !self.item_type.reasons().contains(&reason) {
            return Err(DraftError::UnknownReason(reason.to_string()));
        }
        if reason != OTHER_REASON {
            self.other_text.clear();
        }
        self.reason = Some(reason.to_string());
        Ok(())
    }

    pub fn set_other_text(&mut self, text: &str) {
        self.other_text = truncate_chars(text, MAX_OTHER_TEXT);
    }

    pub fn set_details(&mut self, text: &str) {
        self.details = truncate_chars(text, MAX_DETAILS);
    }

    /// Validate the draft and build the API payload.
    pub fn submission(&self) -> Result<ReportSubmission, DraftError> {
        if self.item_id.trim().is_empty() {
            return Err(DraftError::MissingItemId);
        }
        let reason = self.reason.as_deref().ok_or(DraftError::MissingReason)?;

        let category = if reason == OTHER_REASON {
            let text = self.other_text.trim();
            if text.is_empty() {
                return Err(DraftError::MissingOtherText);
            }
            format!("{}: {}", OTHER_REASON, text)
        } else {
            reason.to_string()
        };

        let message = Some(self.details.clone()).filter(|d| !d.is_empty());

        Ok(ReportSubmission {
            item_type: self.item_type,
            item_id: self.item_id.clone(),
            category,
            message,
        })
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
