//! Domain records shown in the admin dashboard.

pub mod analytics;
pub mod listing;
pub mod payment;
pub mod user;

pub use analytics::{AdminStats, FunnelStage, GeoCount, MonthlyRevenue, PageViews, RevenueShare};
pub use listing::{AdminListing, ListingStatus};
pub use payment::{
    AdminPayment, PaymentKind, PaymentStatus, RevenueSummary, monthly_revenue, revenue_by_role,
};
pub use user::AdminUser;
