//! Request handlers for the dashboard.

use crate::auth::session_token;
use crate::download::ResponseSink;
use crate::error::DashboardError;
use crate::pages;
use crate::state::{AdminSession, AppState};
use crate::tables::{LISTINGS_CSV, PAYMENTS_CSV, USERS_CSV};
use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::{Html, Redirect, Response},
};
use migrent_backend::{Caller, SubmitReceipt};
use migrent_core::{ReportDraft, ReportItemType, ReportStatus, Role};
use migrent_table::{ViewState, export_csv};
use serde::Deserialize;

type PageResult = Result<Html<String>, DashboardError>;

// =============================================================================
// Page Handlers (HTML responses)
// =============================================================================

/// Handler for the public home page.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    Html(pages::home_page(&state))
}

/// The dashboard root lands on the overview.
pub async fn admin_index(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.admin_path("overview"))
}

/// Handler for the admin overview.
pub async fn overview(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> PageResult {
    let stats = session.repository(&state).stats().await?;
    Ok(Html(pages::overview_page(&state, &session, &stats)))
}

/// Handler for user management.
pub async fn users(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(view): Query<ViewState>,
) -> PageResult {
    let users = session.repository(&state).users().await?;
    Ok(Html(pages::users_page(&state, &session, &users, &view)))
}

/// Handler for listing moderation.
pub async fn listings(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(view): Query<ViewState>,
) -> PageResult {
    let listings = session.repository(&state).listings().await?;
    Ok(Html(pages::listings_page(&state, &session, &listings, &view)))
}

/// Handler for the revenue report.
pub async fn revenue(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(view): Query<ViewState>,
) -> PageResult {
    let repo = session.repository(&state);
    let payments = repo.payments().await?;
    let monthly = repo.monthly_revenue().await?;
    let by_role = repo.revenue_by_role().await?;
    Ok(Html(pages::revenue_page(
        &state,
        &session,
        &payments,
        &monthly,
        &by_role,
        &view,
    )))
}

/// Handler for the analytics page.
pub async fn analytics(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> PageResult {
    let repo = session.repository(&state);
    let funnel = repo.signup_funnel().await?;
    let page_views = repo.page_views().await?;
    let geo = repo.geo_distribution().await?;
    Ok(Html(pages::analytics_page(&state, &session, &funnel, &page_views, &geo)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    pub status: Option<String>,
}

/// Handler for the report moderation queue.
pub async fn reports(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Query(query): Query<ReportsQuery>,
) -> PageResult {
    let filter = match query.status.as_deref() {
        None | Some("") => ReportStatus::Pending,
        Some(raw) => raw.parse::<ReportStatus>().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Unknown report filter, showing pending");
            ReportStatus::Pending
        }),
    };
    let reports = state.backend().reports.list(&session.caller(), filter).await?;
    Ok(Html(pages::reports_page(&state, &session, &reports, filter)))
}

// =============================================================================
// CSV Downloads
// =============================================================================

/// All users as CSV, independent of any on-screen search or filter.
pub async fn users_csv(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Response, DashboardError> {
    let users = session.repository(&state).users().await?;
    let document = state.tables().user_export.to_csv(&users);
    Ok(export_csv(&mut ResponseSink, USERS_CSV, &document)?)
}

pub async fn listings_csv(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Response, DashboardError> {
    let listings = session.repository(&state).listings().await?;
    let document = state.tables().listing_export.to_csv(&listings);
    Ok(export_csv(&mut ResponseSink, LISTINGS_CSV, &document)?)
}

pub async fn revenue_csv(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Response, DashboardError> {
    let payments = session.repository(&state).payments().await?;
    let document = state.tables().payment_export.to_csv(&payments);
    Ok(export_csv(&mut ResponseSink, PAYMENTS_CSV, &document)?)
}

// =============================================================================
// Moderation Actions (POST, redirect back)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
}

pub async fn set_user_role(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(user_id): Path<String>,
    Form(form): Form<RoleForm>,
) -> Result<Redirect, DashboardError> {
    let role: Role = form.role.parse().map_err(DashboardError::InvalidRequest)?;
    session.repository(&state).set_user_role(&user_id, role).await?;
    Ok(Redirect::to(&state.admin_path("users")))
}

pub async fn toggle_suspended(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(user_id): Path<String>,
) -> Result<Redirect, DashboardError> {
    session.repository(&state).toggle_suspended(&user_id).await?;
    Ok(Redirect::to(&state.admin_path("users")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(user_id): Path<String>,
) -> Result<Redirect, DashboardError> {
    if user_id == session.identity.id {
        return Err(DashboardError::InvalidRequest(
            "you cannot delete your own account".to_string(),
        ));
    }
    session.repository(&state).delete_user(&user_id).await?;
    Ok(Redirect::to(&state.admin_path("users")))
}

pub async fn approve_listing(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(listing_id): Path<String>,
) -> Result<Redirect, DashboardError> {
    session.repository(&state).approve_listing(&listing_id).await?;
    Ok(Redirect::to(&state.admin_path("listings")))
}

pub async fn reject_listing(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(listing_id): Path<String>,
) -> Result<Redirect, DashboardError> {
    session.repository(&state).reject_listing(&listing_id).await?;
    Ok(Redirect::to(&state.admin_path("listings")))
}

pub async fn delete_listing(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(listing_id): Path<String>,
) -> Result<Redirect, DashboardError> {
    session.repository(&state).delete_listing(&listing_id).await?;
    Ok(Redirect::to(&state.admin_path("listings")))
}

pub async fn set_report_status(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(report_id): Path<String>,
    Query(query): Query<ReportsQuery>,
) -> Result<Redirect, DashboardError> {
    let status: ReportStatus = query
        .status
        .as_deref()
        .ok_or_else(|| DashboardError::InvalidRequest("status is required".to_string()))?
        .parse()
        .map_err(DashboardError::InvalidRequest)?;
    state
        .backend()
        .reports
        .set_status(&session.caller(), &report_id, status)
        .await?;
    Ok(Redirect::to(&state.admin_path("reports")))
}

// =============================================================================
// Report Submission (public, JSON)
// =============================================================================

/// A report as filled in by a signed-in user.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub item_type: ReportItemType,
    pub item_id: String,
    pub reason: String,
    #[serde(default)]
    pub other_text: String,
    #[serde(default)]
    pub details: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// Validate a report through the draft flow and file it as the caller.
pub async fn submit_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ReportRequest>,
) -> Result<Json<SubmitReceipt>, DashboardError> {
    let token = session_token(&headers)
        .or_else(|| bearer_token(&headers))
        .ok_or(DashboardError::NotSignedIn)?;
    let identity = state
        .backend()
        .auth
        .identity_for_token(&token)
        .await?
        .ok_or(DashboardError::NotSignedIn)?;

    let mut draft = ReportDraft::new(request.item_type, request.item_id);
    if !request.reason.is_empty() {
        draft
            .select_reason(&request.reason)
            .map_err(|e| DashboardError::InvalidRequest(e.to_string()))?;
    }
    draft.set_other_text(&request.other_text);
    draft.set_details(&request.details);
    let submission = draft
        .submission()
        .map_err(|e| DashboardError::InvalidRequest(e.to_string()))?;

    let caller = Caller::new(token, identity.id);
    let receipt = state.backend().reports.submit(&caller, &submission).await?;
    Ok(Json(receipt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
