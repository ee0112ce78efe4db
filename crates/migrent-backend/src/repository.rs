//! Admin data repository.

use crate::error::BackendError;
use crate::hosted::{HostedClient, ensure_success, eq_filter, rest_path};
use async_trait::async_trait;
use chrono::NaiveDate;
use migrent_core::{
    AdminListing, AdminPayment, AdminStats, AdminUser, FunnelStage, GeoCount, ListingStatus,
    MonthlyRevenue, PageViews, PaymentStatus, RevenueShare, Role, monthly_revenue,
    revenue_by_role,
};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Source of everything the admin pages display, plus the moderation
/// actions they offer.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn users(&self) -> Result<Vec<AdminUser>, BackendError>;

    async fn listings(&self) -> Result<Vec<AdminListing>, BackendError>;

    async fn payments(&self) -> Result<Vec<AdminPayment>, BackendError>;

    async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, BackendError>;

    async fn revenue_by_role(&self) -> Result<Vec<RevenueShare>, BackendError>;

    async fn signup_funnel(&self) -> Result<Vec<FunnelStage>, BackendError>;

    async fn page_views(&self) -> Result<Vec<PageViews>, BackendError>;

    async fn geo_distribution(&self) -> Result<Vec<GeoCount>, BackendError>;

    async fn stats(&self) -> Result<AdminStats, BackendError>;

    async fn set_user_role(&self, user_id: &str, role: Role) -> Result<AdminUser, BackendError>;

    /// Flip the suspension flag and return the updated account.
    async fn toggle_suspended(&self, user_id: &str) -> Result<AdminUser, BackendError>;

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError>;

    /// Move a listing to `status`, subject to [`ListingStatus::can_become`].
    async fn set_listing_status(
        &self,
        listing_id: &str,
        status: ListingStatus,
    ) -> Result<AdminListing, BackendError>;

    async fn delete_listing(&self, listing_id: &str) -> Result<(), BackendError>;

    async fn approve_listing(&self, listing_id: &str) -> Result<AdminListing, BackendError> {
        self.set_listing_status(listing_id, ListingStatus::Active).await
    }

    async fn reject_listing(&self, listing_id: &str) -> Result<AdminListing, BackendError> {
        self.set_listing_status(listing_id, ListingStatus::Rejected).await
    }
}

pub(crate) fn check_listing_move(
    listing: &AdminListing,
    next: ListingStatus,
) -> Result<(), BackendError> {
    if listing.status.can_become(next) {
        Ok(())
    } else {
        Err(BackendError::InvalidTransition(format!(
            "listing '{}' cannot go from {} to {}",
            listing.id, listing.status, next
        )))
    }
}

/// Live admin data from the hosted database's REST endpoint.
///
/// Queries run as `bearer`, so row-level security applies to the admin's
/// own token.
#[derive(Debug, Clone)]
pub struct HostedRepository {
    client: HostedClient,
    bearer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    created_at: String,
    #[serde(default)]
    last_active: Option<String>,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    suspended: bool,
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    title: String,
    #[serde(default)]
    owner_email: Option<String>,
    #[serde(default)]
    suburb: Option<String>,
    status: ListingStatus,
    #[serde(default)]
    applicants: Option<u32>,
    weekly_price: u32,
    created_at: String,
}

const PROFILE_COLUMNS: &str = "id,email,role,created_at,last_active,verified,suspended";
const LISTING_COLUMNS: &str =
    "id,title,owner_email,suburb,status,applicants,weekly_price,created_at";
const PAYMENT_COLUMNS: &str = "id,email,amount,type,date,status";

/// Date part of a timestamp column.
fn date_of(timestamp: &str) -> Result<NaiveDate, BackendError> {
    let day = timestamp.get(..10).unwrap_or(timestamp);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| BackendError::parse(format!("bad date '{}': {}", timestamp, e)))
}

impl ProfileRow {
    fn into_user(self) -> Result<AdminUser, BackendError> {
        let signup_date = date_of(&self.created_at)?;
        let last_active = match self.last_active.as_deref() {
            Some(ts) => date_of(ts)?,
            None => signup_date,
        };
        Ok(AdminUser {
            id: self.id,
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or(Role::Seeker),
            signup_date,
            last_active,
            verified: self.verified,
            suspended: self.suspended,
        })
    }
}

impl ListingRow {
    fn into_listing(self) -> Result<AdminListing, BackendError> {
        Ok(AdminListing {
            created_at: date_of(&self.created_at)?,
            id: self.id,
            title: self.title,
            owner_email: self.owner_email.unwrap_or_default(),
            suburb: self.suburb.unwrap_or_default(),
            status: self.status,
            applicants: self.applicants.unwrap_or(0),
            weekly_price: self.weekly_price,
        })
    }
}

impl HostedRepository {
    pub fn new(client: HostedClient) -> Self {
        Self {
            client,
            bearer: None,
        }
    }

    /// Same repository, querying as the holder of `token`.
    pub fn with_bearer(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            bearer: Some(token.into()),
        }
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &str) -> Result<Vec<T>, BackendError> {
        let response = self
            .client
            .request(Method::GET, &rest_path(table, query), self.bearer.as_deref())
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// PATCH one row by id and return its new representation.
    async fn update_one<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        columns: &str,
        patch: serde_json::Value,
    ) -> Result<T, BackendError> {
        let query = format!("{}&select={}", eq_filter("id", id), columns);
        let response = self
            .client
            .request(Method::PATCH, &rest_path(table, &query), self.bearer.as_deref())
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        let mut rows: Vec<T> = ensure_success(response).await?.json().await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(BackendError::NotFound(format!("{} '{}'", table, id))),
            n => Err(BackendError::parse(format!("{} rows updated for '{}'", n, id))),
        }
    }

    async fn delete_one(&self, table: &str, id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .request(Method::DELETE, &rest_path(table, &eq_filter("id", id)), self.bearer.as_deref())
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = ensure_success(response).await?.json().await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound(format!("{} '{}'", table, id)));
        }
        tracing::info!(table, id, "Deleted row");
        Ok(())
    }

    async fn user(&self, user_id: &str) -> Result<AdminUser, BackendError> {
        let query = format!("{}&select={}", eq_filter("id", user_id), PROFILE_COLUMNS);
        let rows: Vec<ProfileRow> = self.select("profiles", &query).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("user '{}'", user_id)))?
            .into_user()
    }

    async fn listing(&self, listing_id: &str) -> Result<AdminListing, BackendError> {
        let query = format!("{}&select={}", eq_filter("id", listing_id), LISTING_COLUMNS);
        let rows: Vec<ListingRow> = self.select("listings", &query).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("listing '{}'", listing_id)))?
            .into_listing()
    }
}

#[async_trait]
impl AdminRepository for HostedRepository {
    async fn users(&self) -> Result<Vec<AdminUser>, BackendError> {
        let query = format!("select={}&order=created_at.desc", PROFILE_COLUMNS);
        let rows: Vec<ProfileRow> = self.select("profiles", &query).await?;
        rows.into_iter().map(ProfileRow::into_user).collect()
    }

    async fn listings(&self) -> Result<Vec<AdminListing>, BackendError> {
        let query = format!("select={}&order=created_at.desc", LISTING_COLUMNS);
        let rows: Vec<ListingRow> = self.select("listings", &query).await?;
        rows.into_iter().map(ListingRow::into_listing).collect()
    }

    async fn payments(&self) -> Result<Vec<AdminPayment>, BackendError> {
        let query = format!("select={}&order=date.desc", PAYMENT_COLUMNS);
        self.select("payments", &query).await
    }

    async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, BackendError> {
        Ok(monthly_revenue(&self.payments().await?))
    }

    async fn revenue_by_role(&self) -> Result<Vec<RevenueShare>, BackendError> {
        Ok(revenue_by_role(&self.payments().await?))
    }

    async fn signup_funnel(&self) -> Result<Vec<FunnelStage>, BackendError> {
        let users = self.users().await?;
        let listings = self.listings().await?;
        let verified = users.iter().filter(|u| u.verified).count() as u64;
        let active = listings
            .iter()
            .filter(|l| l.status == ListingStatus::Active)
            .count() as u64;
        // Site visits are not recorded in the database.
        Ok(vec![
            FunnelStage {
                stage: "Signed up".to_string(),
                count: users.len() as u64,
            },
            FunnelStage {
                stage: "Verified".to_string(),
                count: verified,
            },
            FunnelStage {
                stage: "Active listing/search".to_string(),
                count: active,
            },
        ])
    }

    async fn page_views(&self) -> Result<Vec<PageViews>, BackendError> {
        tracing::debug!("Page views are not tracked by the hosted backend");
        Ok(Vec::new())
    }

    async fn geo_distribution(&self) -> Result<Vec<GeoCount>, BackendError> {
        let listings = self.listings().await?;
        let mut counts: Vec<GeoCount> = Vec::new();
        for listing in listings.iter().filter(|l| !l.suburb.is_empty()) {
            match counts.iter_mut().find(|g| g.suburb == listing.suburb) {
                Some(geo) => geo.users += 1,
                None => counts.push(GeoCount {
                    suburb: listing.suburb.clone(),
                    users: 1,
                }),
            }
        }
        Ok(counts)
    }

    async fn stats(&self) -> Result<AdminStats, BackendError> {
        let users = self.users().await?;
        let listings = self.listings().await?;
        let payments = self.payments().await?;
        Ok(stats_from(&users, &listings, &payments))
    }

    async fn set_user_role(&self, user_id: &str, role: Role) -> Result<AdminUser, BackendError> {
        let row: ProfileRow = self
            .update_one("profiles", user_id, PROFILE_COLUMNS, serde_json::json!({ "role": role }))
            .await?;
        tracing::info!(user_id, role = %role, "Changed user role");
        row.into_user()
    }

    async fn toggle_suspended(&self, user_id: &str) -> Result<AdminUser, BackendError> {
        let current = self.user(user_id).await?;
        let row: ProfileRow = self
            .update_one(
                "profiles",
                user_id,
                PROFILE_COLUMNS,
                serde_json::json!({ "suspended": !current.suspended }),
            )
            .await?;
        tracing::info!(user_id, suspended = !current.suspended, "Toggled suspension");
        row.into_user()
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        self.delete_one("profiles", user_id).await
    }

    async fn set_listing_status(
        &self,
        listing_id: &str,
        status: ListingStatus,
    ) -> Result<AdminListing, BackendError> {
        let current = self.listing(listing_id).await?;
        check_listing_move(&current, status)?;
        let row: ListingRow = self
            .update_one(
                "listings",
                listing_id,
                LISTING_COLUMNS,
                serde_json::json!({ "status": status }),
            )
            .await?;
        tracing::info!(listing_id, status = %status, "Changed listing status");
        row.into_listing()
    }

    async fn delete_listing(&self, listing_id: &str) -> Result<(), BackendError> {
        self.delete_one("listings", listing_id).await
    }
}

/// Headline numbers derived from full record sets.
pub(crate) fn stats_from(
    users: &[AdminUser],
    listings: &[AdminListing],
    payments: &[AdminPayment],
) -> AdminStats {
    let count = |status: ListingStatus| listings.iter().filter(|l| l.status == status).count() as u64;
    let completed = payments.iter().filter(|p| p.status == PaymentStatus::Completed);
    let total_revenue = completed.clone().map(|p| u64::from(p.amount)).sum();
    let latest_month = payments.iter().map(|p| p.date.format("%Y-%m").to_string()).max();
    let monthly_revenue = completed
        .filter(|p| Some(p.date.format("%Y-%m").to_string()) == latest_month)
        .map(|p| u64::from(p.amount))
        .sum();

    AdminStats {
        total_users: users.len() as u64,
        active_listings: count(ListingStatus::Active),
        pending_listings: count(ListingStatus::Pending),
        total_revenue,
        monthly_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_row_maps_timestamps() {
        let row: ProfileRow = serde_json::from_str(
            r#"{"id":"u1","email":"alice@gmail.com","role":"seeker",
                "created_at":"2025-11-02T09:15:00.000+00:00","last_active":null,
                "verified":true,"suspended":false}"#,
        )
        .unwrap();
        let user = row.into_user().unwrap();
        assert_eq!(user.signup_date, NaiveDate::from_ymd_opt(2025, 11, 2).unwrap());
        assert_eq!(user.last_active, user.signup_date);
        assert_eq!(user.role, Role::Seeker);
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        assert!(matches!(date_of("yesterday"), Err(BackendError::Parse(_))));
    }

    #[test]
    fn test_listing_move_rules() {
        let row: ListingRow = serde_json::from_str(
            r#"{"id":"l6","title":"Penthouse Darlinghurst","status":"rejected",
                "weekly_price":600,"created_at":"2026-01-25"}"#,
        )
        .unwrap();
        let listing = row.into_listing().unwrap();
        assert!(matches!(
            check_listing_move(&listing, ListingStatus::Active),
            Err(BackendError::InvalidTransition(_))
        ));
    }
}
