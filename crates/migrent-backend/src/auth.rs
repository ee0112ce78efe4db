//! Sessions: signing in, resolving access tokens to identities, signing out.

use crate::error::BackendError;
use crate::hosted::{HostedClient, ensure_success};
use async_trait::async_trait;
use migrent_access::{AccessError, AuthProvider, Identity, Session};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub access_token: String,
    pub identity: Identity,
}

/// Token-based session service.
#[async_trait]
pub trait SessionAuth: Send + Sync {
    /// Exchange credentials for an access token.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, BackendError>;

    /// Identity behind `token`, `None` when the token is not (or no longer)
    /// valid.
    async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, BackendError>;

    /// Revoke `token`.
    async fn sign_out(&self, token: &str) -> Result<(), BackendError>;
}

/// The session carried by one request, seen through [`AuthProvider`].
pub struct TokenSession {
    auth: Arc<dyn SessionAuth>,
    token: Option<String>,
}

impl TokenSession {
    pub fn new(auth: Arc<dyn SessionAuth>, token: Option<String>) -> Self {
        Self { auth, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[async_trait]
impl AuthProvider for TokenSession {
    async fn current_session(&self) -> Result<Session, AccessError> {
        let Some(token) = self.token.as_deref() else {
            return Ok(Session::SignedOut);
        };
        let identity = self
            .auth
            .identity_for_token(token)
            .await
            .map_err(|e| AccessError::Session(e.to_string()))?;
        Ok(Session::from(identity))
    }

    async fn sign_out(&self) -> Result<(), AccessError> {
        match self.token.as_deref() {
            Some(token) => self
                .auth
                .sign_out(token)
                .await
                .map_err(|e| AccessError::Session(e.to_string())),
            None => Ok(()),
        }
    }
}

/// Hosted auth service (`/auth/v1`).
#[derive(Debug, Clone)]
pub struct HostedAuth {
    client: HostedClient,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<Value>,
    #[serde(default)]
    app_metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserResponse,
}

impl UserResponse {
    /// Role claim from user metadata, falling back to app metadata.
    /// Non-string values are ignored.
    fn role_claim(&self) -> Option<String> {
        [&self.user_metadata, &self.app_metadata]
            .into_iter()
            .flatten()
            .find_map(|meta| meta.get("role").and_then(Value::as_str))
            .map(String::from)
    }

    fn into_identity(self) -> Identity {
        let role_claim = self.role_claim();
        Identity {
            id: self.id,
            email: self.email,
            role_claim,
        }
    }
}

impl HostedAuth {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionAuth for HostedAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, BackendError> {
        let response = self
            .client
            .request(Method::POST, "/auth/v1/token?grant_type=password", None)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = match ensure_success(response).await {
            Ok(response) => response,
            Err(BackendError::Http { status: 400, message }) => {
                return Err(BackendError::Unauthorized(message));
            }
            Err(e) => return Err(e),
        };

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("token response: {}", e)))?;

        tracing::info!(user_id = %token.user.id, "Signed in");
        Ok(SignedIn {
            access_token: token.access_token,
            identity: token.user.into_identity(),
        })
    }

    async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, BackendError> {
        let response = self
            .client
            .request(Method::GET, "/auth/v1/user", Some(token))
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::debug!("Access token rejected");
            return Ok(None);
        }

        let user: UserResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("user response: {}", e)))?;
        Ok(Some(user.into_identity()))
    }

    async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .request(Method::POST, "/auth/v1/logout", Some(token))
            .send()
            .await?;
        ensure_success(response).await?;
        tracing::info!("Signed out");
        Ok(())
    }
}
