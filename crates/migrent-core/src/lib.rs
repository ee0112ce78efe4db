//! Shared types for the MigRent superadmin dashboard.
//!
//! This crate holds what every other MigRent crate agrees on:
//! - Configuration loaded from `migrent.yaml`
//! - Domain records shown in the admin tables (users, listings, payments)
//! - Analytics series for the overview and revenue pages
//! - Content reports and the staged report draft flow

// Configuration types shared across all MigRent crates
pub mod config;

// Domain records
pub mod models;
pub mod report;
pub mod role;

pub use config::{
    AccessConfig, ApiConfig, BackendConfig, ConfigError, DashboardConfig, DataSource,
    MigrentConfig, ObservabilityConfig,
};
pub use models::{
    AdminListing, AdminPayment, AdminStats, AdminUser, FunnelStage, GeoCount, ListingStatus,
    MonthlyRevenue, PageViews, PaymentKind, PaymentStatus, RevenueShare, RevenueSummary,
    monthly_revenue, revenue_by_role,
};
pub use report::{
    DraftError, Report, ReportDraft, ReportItemType, ReportStatus, ReportSubmission,
};
pub use role::Role;
