//! Room listing records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Pending,
    Rejected,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Active,
        ListingStatus::Pending,
        ListingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Pending => "pending",
            ListingStatus::Rejected => "rejected",
        }
    }

    /// Moderation moves: pending listings are approved or rejected, active
    /// ones can still be rejected. Rejection is final.
    pub fn can_become(&self, next: ListingStatus) -> bool {
        matches!(
            (self, next),
            (ListingStatus::Pending, ListingStatus::Active)
                | (ListingStatus::Pending, ListingStatus::Rejected)
                | (ListingStatus::Active, ListingStatus::Rejected)
        )
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown listing status '{}'", s))
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listing as shown in the listing management table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminListing {
    pub id: String,
    pub title: String,
    pub owner_email: String,
    pub suburb: String,
    pub status: ListingStatus,
    #[serde(default)]
    pub applicants: u32,
    /// Weekly rent in whole AUD.
    pub weekly_price: u32,
    pub created_at: NaiveDate,
}
