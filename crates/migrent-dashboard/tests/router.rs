//! End-to-end tests for the dashboard router against the sample backend.
//!
//! Run with: cargo test --package migrent-dashboard --test router

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use migrent_backend::Backend;
use migrent_core::MigrentConfig;
use migrent_dashboard::{AppState, create_router};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(MigrentConfig::default(), Backend::sample()).unwrap();
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Sign in through the form and return the `Cookie` header value to replay.
async fn sign_in(app: &Router, email: &str) -> String {
    let form = format!("email={}&password=secret", urlencoding::encode(email));
    let response = send(
        app,
        Request::post("/signin")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(path: &str, cookie: &str) -> Request<Body> {
    Request::post(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Test that an anonymous visitor is sent to sign-in with the way back attached.
#[tokio::test]
async fn test_anonymous_redirects_to_signin() {
    let app = app();
    let response = send(&app, get("/admin/users?q=bob", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signin?redirect=%2Fadmin%2Fusers%3Fq%3Dbob");
}

/// Test that a superadmin sign-in lands on the overview and the page renders.
#[tokio::test]
async fn test_superadmin_sees_overview() {
    let app = app();
    let cookie = sign_in(&app, "admin@migrent.com.au").await;

    let response = send(&app, get("/admin/overview", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Total Users"));
    assert!(html.contains("127"));
}

/// Test that the dashboard root sends admins to the overview, behind the gate.
#[tokio::test]
async fn test_dashboard_root_redirects_to_overview() {
    let app = app();
    let response = send(&app, get("/admin", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signin?redirect=%2Fadmin");

    let cookie = sign_in(&app, "admin@migrent.com.au").await;
    let response = send(&app, get("/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/overview");
}

/// Test that signing in from the redirect lands back on the requested page.
#[tokio::test]
async fn test_signin_returns_to_requested_page() {
    let app = app();
    let response = send(&app, get("/admin/listings?filter=pending", None)).await;
    let signin = location(&response).to_string();
    let back = signin.strip_prefix("/signin?redirect=").unwrap();
    assert_eq!(back, "%2Fadmin%2Flistings%3Ffilter%3Dpending");

    let form = format!("email=admin%40migrent.com.au&password=secret&redirect={}", back);
    let response = send(
        &app,
        Request::post("/signin")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_string();
    assert_eq!(target, "/admin/listings?filter=pending");

    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let response = send(&app, get(&target, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Test that a signed-in seeker is sent back to the home page.
#[tokio::test]
async fn test_seeker_redirects_home() {
    let app = app();
    let cookie = sign_in(&app, "alice@gmail.com").await;

    let response = send(&app, get("/admin/overview", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

/// Test that an unknown token is treated as signed out.
#[tokio::test]
async fn test_forged_cookie_redirects_to_signin() {
    let app = app();
    let response = send(&app, get("/admin/overview", Some("migrent_session=forged"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/signin?redirect="));
}

/// Test that a bad password bounces back to the form with an error flag.
#[tokio::test]
async fn test_failed_signin_reports_error() {
    let app = app();
    let response = send(
        &app,
        Request::post("/signin")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=nobody%40example.com&password=x"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/signin?error=invalid");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

/// Test that the users table honours search and the CSV ignores it.
#[tokio::test]
async fn test_users_search_and_csv_export() {
    let app = app();
    let cookie = sign_in(&app, "admin@migrent.com.au").await;

    let response = send(&app, get("/admin/users?q=GMAIL", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("alice@gmail.com"));
    assert!(!html.contains("bob@outlook.com"));

    let response = send(&app, get("/admin/users.csv?q=GMAIL", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"migrent-users.csv\""
    );
    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Email,Role,Signup Date,Last Active,Verified,Suspended")
    );
    assert_eq!(lines.count(), 12);
}

/// Test that approving a pending listing redirects back and updates the stats.
#[tokio::test]
async fn test_approve_listing_action() {
    let app = app();
    let cookie = sign_in(&app, "admin@migrent.com.au").await;

    let response = send(&app, post("/admin/listings/l3/approve", &cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/listings");

    let response = send(&app, post("/admin/listings/l6/approve", &cookie)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Test that demoting a user is seen by the gate on their next request.
#[tokio::test]
async fn test_role_change_applies_to_next_request() {
    let app = app();
    let admin = sign_in(&app, "admin@migrent.com.au").await;
    let bob = sign_in(&app, "bob@outlook.com").await;

    let response = send(
        &app,
        Request::post("/admin/users/u2/role")
            .header(header::COOKIE, &admin)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("role=superadmin"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Bob's role claim still says owner; the stored record wins.
    let response = send(&app, get("/admin/overview", Some(&bob))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Test that a second pending report on the same item is a conflict.
#[tokio::test]
async fn test_duplicate_report_conflicts() {
    let app = app();
    let cookie = sign_in(&app, "alice@gmail.com").await;
    let report = |item_id: &str| {
        Request::post("/report")
            .header(header::COOKIE, &cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(
                r#"{{"item_type":"listing","item_id":"{}","reason":"Suspected scam or fraud"}}"#,
                item_id
            )))
            .unwrap()
    };

    let response = send(&app, report("l1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let receipt: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(receipt["status"], "ok");

    let response = send(&app, report("l7")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_text(response).await, "You have already reported this.");
}

/// Test that reporting requires a session.
#[tokio::test]
async fn test_report_requires_session() {
    let app = app();
    let response = send(
        &app,
        Request::post("/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"item_id":"l1","reason":"Duplicate listing"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Test that a moderation outcome moves a report out of the pending queue.
#[tokio::test]
async fn test_report_moderation() {
    let app = app();
    let cookie = sign_in(&app, "admin@migrent.com.au").await;

    let response = send(&app, post("/admin/reports/r1/status?status=actioned", &cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_text(send(&app, get("/admin/reports", Some(&cookie))).await).await;
    assert!(!html.contains("Owner asked for a bond"));
    let html = body_text(send(&app, get("/admin/reports?status=actioned", Some(&cookie))).await).await;
    assert!(html.contains("Owner asked for a bond"));

    let response = send(&app, post("/admin/reports/r2/status?status=pending", &cookie)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
