//! Route definitions for the dashboard.

use crate::{auth, handlers, state::AppState};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Admin pages, CSV downloads and moderation actions.
///
/// Every route here sits behind the access gate.
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::admin_index))
        .route("/overview", get(handlers::overview))
        .route("/users", get(handlers::users))
        .route("/users.csv", get(handlers::users_csv))
        .route("/users/{id}/role", post(handlers::set_user_role))
        .route("/users/{id}/suspend", post(handlers::toggle_suspended))
        .route("/users/{id}/delete", post(handlers::delete_user))
        .route("/listings", get(handlers::listings))
        .route("/listings.csv", get(handlers::listings_csv))
        .route("/listings/{id}/approve", post(handlers::approve_listing))
        .route("/listings/{id}/reject", post(handlers::reject_listing))
        .route("/listings/{id}/delete", post(handlers::delete_listing))
        .route("/revenue", get(handlers::revenue))
        .route("/revenue.csv", get(handlers::revenue_csv))
        .route("/analytics", get(handlers::analytics))
        .route("/reports", get(handlers::reports))
        .route("/reports/{id}/status", post(handlers::set_report_status))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::access_middleware,
        ))
}

/// Create the dashboard router.
///
/// `base_path` must not be the site root; config validation rejects it.
pub fn create_router(state: AppState) -> Router {
    let dashboard = state.dashboard();
    let base_path = dashboard.base_path.trim_end_matches('/').to_string();
    let signin_path = dashboard.signin_path.clone();
    let home_path = dashboard.home_path.clone();

    let public = Router::new()
        .route(&home_path, get(handlers::home))
        .route(&signin_path, get(auth::signin_page).post(auth::signin_submit))
        .route("/signout", post(auth::signout).get(auth::signout))
        .route("/report", post(handlers::submit_report));

    public
        .nest(&base_path, admin_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
