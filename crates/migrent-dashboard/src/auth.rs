//! Session cookies, sign-in/sign-out, and the access gate middleware.
//!
//! Every admin request mounts a fresh gate from the shared
//! [`AccessController`](migrent_access::AccessController), resolves the
//! session carried by the `migrent_session` cookie, and only runs the
//! handler once the gate settles in `Granted`. The mount lives on the
//! request future, so a dropped connection drops the mount and cancels any
//! in-flight role lookup.

use crate::pages;
use crate::state::{AdminSession, AppState};
use axum::{
    Form,
    extract::{OriginalUri, Query, Request, State},
    http::{HeaderMap, StatusCode, Uri, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use migrent_access::{AccessState, RecordingNavigator, RedirectTarget};
use migrent_backend::{BackendError, TokenSession};
use serde::Deserialize;
use std::sync::Arc;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "migrent_session";

/// Access token carried by the session cookie, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(extract_session_cookie)
}

/// Extract session cookie value from cookie header
fn extract_session_cookie(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(&format!("{}=", SESSION_COOKIE_NAME)))
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        SESSION_COOKIE_NAME, token
    )
}

fn cleared_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    )
}

/// The URI as the client sent it, before `nest` stripped `base_path`.
fn request_target(request: &Request) -> Uri {
    request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone())
}

/// Gate in front of every admin route.
pub async fn access_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(request.headers());
    let navigator = Arc::new(RecordingNavigator::new());
    let mount = state.access().mount(navigator.clone());
    let session = TokenSession::new(state.backend().auth.clone(), token.clone());

    let decision = mount.resolve(&session).await;
    let uri = request_target(&request);
    let path = uri.path().to_string();
    tracing::debug!(path = %path, decision = %decision, "Access decision");

    match decision {
        AccessState::Granted => {
            let (Some(access_token), Some(identity)) = (token, mount.identity()) else {
                return StatusCode::UNAUTHORIZED.into_response();
            };
            request.extensions_mut().insert(AdminSession {
                access_token,
                identity,
            });
            next.run(request).await
        }
        AccessState::Redirecting(target) => {
            let policy = state.access().policy();
            let to = navigator
                .last()
                .unwrap_or_else(|| policy.path_for(target).to_string());
            match target {
                RedirectTarget::SignIn => {
                    let back = uri
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or(path);
                    Redirect::to(&format!("{}?redirect={}", to, urlencoding::encode(&back)))
                        .into_response()
                }
                RedirectTarget::Home => Redirect::to(&to).into_response(),
            }
        }
        AccessState::Denied | AccessState::Unresolved => {
            (StatusCode::FORBIDDEN, Html(pages::unauthorized_page(&state))).into_response()
        }
    }
}

/// Sign-in page query parameters
#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Sign-in form data
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Handler for the sign-in page (GET)
pub async fn signin_page(
    State(state): State<AppState>,
    Query(query): Query<SignInQuery>,
) -> Html<String> {
    Html(pages::signin_page(
        &state,
        query.redirect.as_deref(),
        query.error.as_deref(),
    ))
}

/// Only same-site absolute paths are followed after sign-in.
fn safe_redirect(redirect: Option<String>, fallback: String) -> String {
    redirect
        .filter(|r| r.starts_with('/') && !r.starts_with("//"))
        .unwrap_or(fallback)
}

/// Handler for sign-in form submission (POST)
pub async fn signin_submit(State(state): State<AppState>, Form(form): Form<SignInForm>) -> Response {
    match state.backend().auth.sign_in(form.email.trim(), &form.password).await {
        Ok(signed_in) => {
            let target = safe_redirect(form.redirect, state.admin_path("overview"));
            tracing::info!(user_id = %signed_in.identity.id, "Dashboard sign-in");
            (
                [(header::SET_COOKIE, session_cookie(&signed_in.access_token))],
                Redirect::to(&target),
            )
                .into_response()
        }
        Err(err) => {
            let reason = match err {
                BackendError::Unauthorized(_) => "invalid",
                other => {
                    tracing::warn!(error = %other, "Sign-in failed");
                    "unavailable"
                }
            };
            let redirect = form
                .redirect
                .map(|r| format!("&redirect={}", urlencoding::encode(&r)))
                .unwrap_or_default();
            Redirect::to(&format!(
                "{}?error={}{}",
                state.dashboard().signin_path,
                reason,
                redirect
            ))
            .into_response()
        }
    }
}

/// Handler for sign-out: revoke the token, clear the cookie, go home.
pub async fn signout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers)
        && let Err(e) = state.backend().auth.sign_out(&token).await
    {
        tracing::warn!(error = %e, "Sign-out failed; clearing cookie anyway");
    }
    (
        [(header::SET_COOKIE, cleared_cookie())],
        Redirect::to(&state.dashboard().home_path),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_session_cookie() {
        assert_eq!(
            extract_session_cookie("theme=dark; migrent_session=abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(extract_session_cookie("migrent_session="), None);
        assert_eq!(extract_session_cookie("other=1"), None);
    }

    #[test]
    fn test_session_token_scans_all_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("migrent_session=t0k"));
        assert_eq!(session_token(&headers).as_deref(), Some("t0k"));
    }

    #[test]
    fn test_safe_redirect() {
        let fallback = || "/admin/overview".to_string();
        assert_eq!(safe_redirect(Some("/admin/users?q=a".into()), fallback()), "/admin/users?q=a");
        assert_eq!(safe_redirect(Some("//evil.example".into()), fallback()), "/admin/overview");
        assert_eq!(safe_redirect(Some("https://evil.example".into()), fallback()), "/admin/overview");
        assert_eq!(safe_redirect(None, fallback()), "/admin/overview");
    }

    #[test]
    fn test_request_target_prefers_original_uri() {
        let mut request = axum::http::Request::builder()
            .uri("/users?q=bob")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(request_target(&request), "/users?q=bob");

        request
            .extensions_mut()
            .insert(OriginalUri("/admin/users?q=bob".parse().unwrap()));
        assert_eq!(request_target(&request), "/admin/users?q=bob");
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("migrent_session=tok;"));
        assert!(cookie.contains("HttpOnly") && cookie.contains("SameSite=Lax"));
        assert!(cleared_cookie().contains("Max-Age=0"));
    }
}
