//! # migrent-dashboard
//!
//! Superadmin web dashboard for the MigRent room-rental marketplace.
//!
//! Pages, all behind the role gate from `migrent-access`:
//! - Overview (platform stats)
//! - Users (search, role filter, sort, role changes, suspension, CSV)
//! - Listings (search, status filter, approve/reject, CSV)
//! - Revenue (monthly and per-role breakdowns, payments table, CSV)
//! - Analytics (signup funnel, page views, users by suburb)
//! - Reports (moderation queue by status)
//!
//! Server-rendered HTML styled with Tailwind, served by Axum.

pub mod auth;
pub mod download;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod tables;
pub mod templates;

pub use error::DashboardError;
pub use routes::create_router;
pub use server::DashboardServer;
pub use state::{AdminSession, AppState};
