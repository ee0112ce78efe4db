//! Payment records and revenue aggregation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a payment was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    OwnerFee,
    SeekerFee,
    Subscription,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::OwnerFee => "owner_fee",
            PaymentKind::SeekerFee => "seeker_fee",
            PaymentKind::Subscription => "subscription",
        }
    }

    /// Human label, e.g. "owner fee".
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Completed,
        PaymentStatus::Pending,
        PaymentStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One payment row in the revenue table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPayment {
    pub id: String,
    pub email: String,
    /// Amount in whole AUD.
    pub amount: u32,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

/// Totals over completed payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevenueSummary {
    pub total: u64,
    pub completed_count: usize,
    /// Rounded mean of completed payments, 0 when there are none.
    pub average: u64,
}

impl RevenueSummary {
    pub fn from_payments(payments: &[AdminPayment]) -> Self {
        let (total, completed_count) = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .fold((0u64, 0usize), |(sum, n), p| (sum + u64::from(p.amount), n + 1));

        let average = if completed_count > 0 {
            (total as f64 / completed_count as f64).round() as u64
        } else {
            0
        };

        Self {
            total,
            completed_count,
            average,
        }
    }
}

/// Completed revenue per calendar month, oldest first, labelled "Jan".."Dec".
pub fn monthly_revenue(payments: &[AdminPayment]) -> Vec<crate::MonthlyRevenue> {
    let mut months: std::collections::BTreeMap<(i32, u32), u64> = std::collections::BTreeMap::new();
    for p in payments.iter().filter(|p| p.status == PaymentStatus::Completed) {
        *months.entry((p.date.year(), p.date.month())).or_default() += u64::from(p.amount);
    }
    months
        .into_iter()
        .filter_map(|((year, month), revenue)| {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(crate::MonthlyRevenue {
                month: first.format("%b").to_string(),
                revenue,
            })
        })
        .collect()
}

/// Completed revenue split into owner fees and seeker fees.
///
/// Subscriptions are paid by owners and count as owner fees.
pub fn revenue_by_role(payments: &[AdminPayment]) -> Vec<crate::RevenueShare> {
    let (owner, seeker) = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .fold((0u64, 0u64), |(owner, seeker), p| match p.kind {
            PaymentKind::SeekerFee => (owner, seeker + u64::from(p.amount)),
            PaymentKind::OwnerFee | PaymentKind::Subscription => {
                (owner + u64::from(p.amount), seeker)
            }
        });
    vec![
        crate::RevenueShare {
            name: "Owner fees".to_string(),
            value: owner,
        },
        crate::RevenueShare {
            name: "Seeker fees".to_string(),
            value: seeker,
        },
    ]
}
