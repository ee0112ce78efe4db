//! In-memory sample backend.
//!
//! Serves a fixed marketplace snapshot so the dashboard runs without a
//! hosted project. Mutations change the in-memory copy only and are lost
//! on restart.

use crate::auth::{SessionAuth, SignedIn};
use crate::error::BackendError;
use crate::reports::{Caller, LIST_LIMIT, ReportStore, SubmitReceipt, check_outcome};
use crate::repository::{AdminRepository, check_listing_move};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use migrent_access::{AccessError, Identity, UserRecordStore};
use migrent_core::{
    AdminListing, AdminPayment, AdminStats, AdminUser, FunnelStage, GeoCount, ListingStatus,
    MonthlyRevenue, PageViews, PaymentKind, PaymentStatus, Report, ReportItemType, ReportStatus,
    ReportSubmission, RevenueShare, Role,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Headline figures for the whole marketplace; the seeded rows are a sample.
const TOTAL_USERS: u64 = 127;
const TOTAL_REVENUE: u64 = 4872;
const CURRENT_MONTH_REVENUE: u64 = 1293;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .unwrap_or_default()
}

fn seed_users() -> Vec<AdminUser> {
    use Role::*;
    let rows = [
        ("u1", "alice@gmail.com", Seeker, day(2025, 11, 2), day(2026, 2, 1), true, false),
        ("u2", "bob@outlook.com", Owner, day(2025, 10, 15), day(2026, 2, 2), true, false),
        ("u3", "carol@uni.edu.au", Seeker, day(2025, 12, 20), day(2026, 1, 28), false, false),
        ("u4", "dave@realestate.com.au", Owner, day(2025, 9, 5), day(2026, 2, 1), true, false),
        ("u5", "admin@migrent.com.au", Superadmin, day(2025, 8, 1), day(2026, 2, 2), true, false),
        ("u6", "emma@proton.me", Seeker, day(2026, 1, 3), day(2026, 1, 30), true, false),
        ("u7", "frank@yahoo.com", Owner, day(2025, 11, 18), day(2026, 1, 25), true, true),
        ("u8", "grace@icloud.com", Seeker, day(2026, 1, 10), day(2026, 2, 1), false, false),
        ("u9", "henry@live.com.au", Owner, day(2025, 12, 1), day(2026, 1, 29), true, false),
        ("u10", "iris@student.uts.edu.au", Seeker, day(2026, 1, 20), day(2026, 2, 2), false, false),
        ("u11", "jake@domain.com", Seeker, day(2025, 10, 8), day(2026, 1, 15), true, false),
        ("u12", "kate@hotmail.com", Owner, day(2025, 11, 25), day(2026, 2, 1), true, false),
    ];
    rows.into_iter()
        .map(|(id, email, role, signup_date, last_active, verified, suspended)| AdminUser {
            id: id.to_string(),
            email: email.to_string(),
            role,
            signup_date,
            last_active,
            verified,
            suspended,
        })
        .collect()
}

fn seed_listings() -> Vec<AdminListing> {
    use ListingStatus::*;
    let rows = [
        ("l1", "Sunny room in Bondi", "bob@outlook.com", "Bondi", Active, 5, 320, day(2025, 12, 1)),
        ("l2", "Cozy studio near UNSW", "dave@realestate.com.au", "Kensington", Active, 8, 280, day(2025, 12, 15)),
        ("l3", "Modern flat in CBD", "bob@outlook.com", "Sydney CBD", Pending, 0, 450, day(2026, 1, 20)),
        ("l4", "Share house Surry Hills", "henry@live.com.au", "Surry Hills", Active, 3, 350, day(2025, 11, 10)),
        ("l5", "Room in Newtown terrace", "kate@hotmail.com", "Newtown", Active, 6, 290, day(2026, 1, 5)),
        ("l6", "Penthouse Darlinghurst", "dave@realestate.com.au", "Darlinghurst", Rejected, 0, 600, day(2026, 1, 25)),
        ("l7", "Budget room Parramatta", "frank@yahoo.com", "Parramatta", Active, 12, 200, day(2025, 10, 20)),
        ("l8", "Master bed Manly", "henry@live.com.au", "Manly", Pending, 0, 380, day(2026, 2, 1)),
    ];
    rows.into_iter()
        .map(
            |(id, title, owner_email, suburb, status, applicants, weekly_price, created_at)| {
                AdminListing {
                    id: id.to_string(),
                    title: title.to_string(),
                    owner_email: owner_email.to_string(),
                    suburb: suburb.to_string(),
                    status,
                    applicants,
                    weekly_price,
                    created_at,
                }
            },
        )
        .collect()
}

fn seed_payments() -> Vec<AdminPayment> {
    use PaymentKind::*;
    use PaymentStatus::*;
    let rows = [
        ("p1", "bob@outlook.com", 49, OwnerFee, day(2026, 2, 1), Completed),
        ("p2", "alice@gmail.com", 19, SeekerFee, day(2026, 1, 30), Completed),
        ("p3", "dave@realestate.com.au", 49, OwnerFee, day(2026, 1, 28), Completed),
        ("p4", "emma@proton.me", 19, SeekerFee, day(2026, 1, 25), Completed),
        ("p5", "henry@live.com.au", 49, OwnerFee, day(2026, 1, 20), Pending),
        ("p6", "kate@hotmail.com", 49, OwnerFee, day(2026, 1, 18), Completed),
        ("p7", "frank@yahoo.com", 49, OwnerFee, day(2026, 1, 10), Refunded),
        ("p8", "iris@student.uts.edu.au", 19, SeekerFee, day(2026, 1, 8), Completed),
    ];
    rows.into_iter()
        .map(|(id, email, amount, kind, date, status)| AdminPayment {
            id: id.to_string(),
            email: email.to_string(),
            amount,
            kind,
            date,
            status,
        })
        .collect()
}

fn series<T>(rows: &[(&str, u64)], make: impl Fn(String, u64) -> T) -> Vec<T> {
    rows.iter().map(|(label, n)| make(label.to_string(), *n)).collect()
}

#[derive(Debug, Default)]
struct SampleData {
    users: Vec<AdminUser>,
    listings: Vec<AdminListing>,
    payments: Vec<AdminPayment>,
    deleted_users: u64,
}

/// Seeded, mutable in-memory repository.
///
/// Also answers stored-role lookups, so role changes made through the
/// dashboard take effect at the next access check.
#[derive(Debug, Clone, Default)]
pub struct SampleRepository {
    data: Arc<RwLock<SampleData>>,
}

impl SampleRepository {
    pub fn seeded() -> Self {
        Self {
            data: Arc::new(RwLock::new(SampleData {
                users: seed_users(),
                listings: seed_listings(),
                payments: seed_payments(),
                deleted_users: 0,
            })),
        }
    }

    /// Account with `email`, if any.
    pub async fn user_by_email(&self, email: &str) -> Option<AdminUser> {
        let data = self.data.read().await;
        data.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    async fn update_user(
        &self,
        user_id: &str,
        change: impl FnOnce(&mut AdminUser),
    ) -> Result<AdminUser, BackendError> {
        let mut data = self.data.write().await;
        let user = data
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| BackendError::NotFound(format!("user '{}'", user_id)))?;
        change(user);
        Ok(user.clone())
    }
}

#[async_trait]
impl AdminRepository for SampleRepository {
    async fn users(&self) -> Result<Vec<AdminUser>, BackendError> {
        Ok(self.data.read().await.users.clone())
    }

    async fn listings(&self) -> Result<Vec<AdminListing>, BackendError> {
        Ok(self.data.read().await.listings.clone())
    }

    async fn payments(&self) -> Result<Vec<AdminPayment>, BackendError> {
        Ok(self.data.read().await.payments.clone())
    }

    async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, BackendError> {
        Ok(series(
            &[
                ("Sep", 820),
                ("Oct", 1150),
                ("Nov", 1340),
                ("Dec", 1562),
                ("Jan", 1293),
                ("Feb", 480),
            ],
            |month, revenue| MonthlyRevenue { month, revenue },
        ))
    }

    async fn revenue_by_role(&self) -> Result<Vec<RevenueShare>, BackendError> {
        Ok(series(
            &[("Owner fees", 3124), ("Seeker fees", 1748)],
            |name, value| RevenueShare { name, value },
        ))
    }

    async fn signup_funnel(&self) -> Result<Vec<FunnelStage>, BackendError> {
        Ok(series(
            &[
                ("Visited", 2340),
                ("Signed up", 127),
                ("Verified", 89),
                ("Active listing/search", 54),
                ("Matched", 23),
            ],
            |stage, count| FunnelStage { stage, count },
        ))
    }

    async fn page_views(&self) -> Result<Vec<PageViews>, BackendError> {
        Ok(series(
            &[
                ("Jan 1", 120),
                ("Jan 8", 185),
                ("Jan 15", 210),
                ("Jan 22", 245),
                ("Jan 29", 310),
                ("Feb 1", 290),
            ],
            |date, views| PageViews { date, views },
        ))
    }

    async fn geo_distribution(&self) -> Result<Vec<GeoCount>, BackendError> {
        Ok(series(
            &[
                ("Bondi", 18),
                ("Sydney CBD", 24),
                ("Newtown", 15),
                ("Surry Hills", 12),
                ("Parramatta", 21),
                ("Manly", 9),
                ("Kensington", 14),
                ("Darlinghurst", 8),
                ("Redfern", 6),
            ],
            |suburb, users| GeoCount { suburb, users },
        ))
    }

    async fn stats(&self) -> Result<AdminStats, BackendError> {
        let data = self.data.read().await;
        let count = |status: ListingStatus| {
            data.listings.iter().filter(|l| l.status == status).count() as u64
        };
        Ok(AdminStats {
            total_users: TOTAL_USERS.saturating_sub(data.deleted_users),
            active_listings: count(ListingStatus::Active),
            pending_listings: count(ListingStatus::Pending),
            total_revenue: TOTAL_REVENUE,
            monthly_revenue: CURRENT_MONTH_REVENUE,
        })
    }

    async fn set_user_role(&self, user_id: &str, role: Role) -> Result<AdminUser, BackendError> {
        let user = self.update_user(user_id, |u| u.role = role).await?;
        tracing::info!(user_id, role = %role, "Changed user role");
        Ok(user)
    }

    async fn toggle_suspended(&self, user_id: &str) -> Result<AdminUser, BackendError> {
        let user = self
            .update_user(user_id, |u| u.suspended = !u.suspended)
            .await?;
        tracing::info!(user_id, suspended = user.suspended, "Toggled suspension");
        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let before = data.users.len();
        data.users.retain(|u| u.id != user_id);
        if data.users.len() == before {
            return Err(BackendError::NotFound(format!("user '{}'", user_id)));
        }
        data.deleted_users += 1;
        tracing::info!(user_id, "Deleted user");
        Ok(())
    }

    async fn set_listing_status(
        &self,
        listing_id: &str,
        status: ListingStatus,
    ) -> Result<AdminListing, BackendError> {
        let mut data = self.data.write().await;
        let listing = data
            .listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .ok_or_else(|| BackendError::NotFound(format!("listing '{}'", listing_id)))?;
        check_listing_move(listing, status)?;
        listing.status = status;
        tracing::info!(listing_id, status = %status, "Changed listing status");
        Ok(listing.clone())
    }

    async fn delete_listing(&self, listing_id: &str) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        let before = data.listings.len();
        data.listings.retain(|l| l.id != listing_id);
        if data.listings.len() == before {
            return Err(BackendError::NotFound(format!("listing '{}'", listing_id)));
        }
        tracing::info!(listing_id, "Deleted listing");
        Ok(())
    }
}

#[async_trait]
impl UserRecordStore for SampleRepository {
    async fn stored_role(&self, user_id: &str) -> Result<Option<String>, AccessError> {
        let data = self.data.read().await;
        data.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| Some(u.role.as_str().to_string()))
            .ok_or_else(|| AccessError::NotFound(user_id.to_string()))
    }
}

/// Sign-in against the sample accounts.
///
/// Any non-empty password is accepted. The role claim is captured at
/// sign-in and is not refreshed, so it can go stale after a role change.
#[derive(Debug, Clone)]
pub struct SampleAuth {
    repository: SampleRepository,
    tokens: Arc<RwLock<HashMap<String, Identity>>>,
}

impl SampleAuth {
    pub fn new(repository: SampleRepository) -> Self {
        Self {
            repository,
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionAuth for SampleAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, BackendError> {
        if password.is_empty() {
            return Err(BackendError::Unauthorized("Invalid login credentials".to_string()));
        }
        let user = self
            .repository
            .user_by_email(email.trim())
            .await
            .ok_or_else(|| BackendError::Unauthorized("Invalid login credentials".to_string()))?;
        if user.suspended {
            return Err(BackendError::Unauthorized("Account suspended".to_string()));
        }

        let identity = Identity::new(&user.id)
            .with_email(&user.email)
            .with_role_claim(user.role.as_str());
        let access_token = uuid::Uuid::new_v4().to_string();
        self.tokens
            .write()
            .await
            .insert(access_token.clone(), identity.clone());

        tracing::info!(user_id = %user.id, "Signed in");
        Ok(SignedIn {
            access_token,
            identity,
        })
    }

    async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, BackendError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        self.tokens.write().await.remove(token);
        tracing::info!("Signed out");
        Ok(())
    }
}

/// In-memory report queue seeded with a few pending reports.
#[derive(Debug, Clone, Default)]
pub struct SampleReportStore {
    reports: Arc<RwLock<Vec<Report>>>,
}

impl SampleReportStore {
    pub fn seeded() -> Self {
        let report = |id: &str, reporter: &str, item: &str, kind, reason: &str, details: &str, created| Report {
            id: id.to_string(),
            reporter_id: reporter.to_string(),
            listing_id: item.to_string(),
            item_type: kind,
            reason: reason.to_string(),
            details: details.to_string(),
            status: ReportStatus::Pending,
            created_at: created,
            reviewed_by: None,
        };
        let reports = vec![
            report(
                "r1",
                "u1",
                "l7",
                ReportItemType::Listing,
                "Suspected scam or fraud",
                "Owner asked for a bond before any inspection.",
                at(2026, 1, 29, 9),
            ),
            report(
                "r2",
                "u6",
                "l3",
                ReportItemType::Listing,
                "Inaccurate listing information",
                "",
                at(2026, 1, 31, 14),
            ),
            report(
                "r3",
                "u12",
                "u7",
                ReportItemType::Profile,
                "Other: keeps messaging after being declined",
                "",
                at(2026, 2, 1, 18),
            ),
        ];
        Self {
            reports: Arc::new(RwLock::new(reports)),
        }
    }
}

#[async_trait]
impl ReportStore for SampleReportStore {
    async fn submit(
        &self,
        caller: &Caller,
        submission: &ReportSubmission,
    ) -> Result<SubmitReceipt, BackendError> {
        if submission.item_id.trim().is_empty() {
            return Err(BackendError::http(400, "item_id is required"));
        }
        let mut reports = self.reports.write().await;
        let duplicate = reports.iter().any(|r| {
            r.status == ReportStatus::Pending
                && r.reporter_id == caller.user_id
                && r.listing_id == submission.item_id
                && r.item_type == submission.item_type
        });
        if duplicate {
            return Err(BackendError::Conflict(
                "You have already reported this.".to_string(),
            ));
        }

        reports.push(Report {
            id: uuid::Uuid::new_v4().to_string(),
            reporter_id: caller.user_id.clone(),
            listing_id: submission.item_id.clone(),
            item_type: submission.item_type,
            reason: submission.category.clone(),
            details: submission.message.clone().unwrap_or_default(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            reviewed_by: None,
        });
        tracing::info!(
            item_type = submission.item_type.as_str(),
            item_id = %submission.item_id,
            "Report submitted"
        );
        Ok(SubmitReceipt::accepted())
    }

    async fn list(&self, _caller: &Caller, status: ReportStatus) -> Result<Vec<Report>, BackendError> {
        let mut matching: Vec<Report> = self
            .reports
            .read()
            .await
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(LIST_LIMIT);
        Ok(matching)
    }

    async fn set_status(
        &self,
        caller: &Caller,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<Report, BackendError> {
        check_outcome(report_id, status)?;
        let mut reports = self.reports.write().await;
        let report = reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_else(|| BackendError::NotFound(format!("report '{}'", report_id)))?;
        report.status = status;
        report.reviewed_by = Some(caller.user_id.clone());
        tracing::info!(report_id, status = %status, reviewer = %caller.user_id, "Report reviewed");
        Ok(report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sizes() {
        assert_eq!(seed_users().len(), 12);
        assert_eq!(seed_listings().len(), 8);
        assert_eq!(seed_payments().len(), 8);
    }

    #[tokio::test]
    async fn test_stats_count_listings() {
        let repo = SampleRepository::seeded();
        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_users, 127);
        assert_eq!(stats.active_listings, 5);
        assert_eq!(stats.pending_listings, 2);
        assert_eq!(stats.total_revenue, 4872);
        assert_eq!(stats.monthly_revenue, 1293);
    }

    #[tokio::test]
    async fn test_stored_role_lookup() {
        let repo = SampleRepository::seeded();
        assert_eq!(
            repo.stored_role("u5").await.unwrap().as_deref(),
            Some("superadmin")
        );
        assert!(matches!(
            repo.stored_role("nobody").await,
            Err(AccessError::NotFound(_))
        ));
    }
}
