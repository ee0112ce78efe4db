//! Aggregate series for the overview, revenue and analytics pages.

use serde::{Deserialize, Serialize};

/// Revenue booked in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: u64,
}

/// Revenue split by payer role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueShare {
    pub name: String,
    pub value: u64,
}

/// One stage of the signup funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub stage: String,
    pub count: u64,
}

/// Page views in one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViews {
    pub date: String,
    pub views: u64,
}

/// Active users per suburb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoCount {
    pub suburb: String,
    pub users: u64,
}

/// Headline numbers on the overview page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_listings: u64,
    pub pending_listings: u64,
    pub total_revenue: u64,
    pub monthly_revenue: u64,
}

impl FunnelStage {
    /// Conversion from the previous stage, in whole percent.
    pub fn conversion_from(&self, previous: &FunnelStage) -> Option<u64> {
        if previous.count == 0 {
            return None;
        }
        Some(((self.count as f64 / previous.count as f64) * 100.0).round() as u64)
    }
}
