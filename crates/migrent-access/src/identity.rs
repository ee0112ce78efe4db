//! Authenticated actors and session snapshots.

use serde::{Deserialize, Serialize};

/// An authenticated user as seen by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable account id, key of the user-record store.
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Role carried in the session token. May be stale or missing.
    #[serde(default)]
    pub role_claim: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            role_claim: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_role_claim(mut self, role: impl Into<String>) -> Self {
        self.role_claim = Some(role.into());
        self
    }

    /// Label for logs and the admin header.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

/// One observation of the auth collaborator's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Still resolving.
    Loading,
    /// Resolved, nobody signed in.
    SignedOut,
    /// Resolved to an identity.
    SignedIn(Identity),
}

impl Session {
    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Loading)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

impl From<Option<Identity>> for Session {
    fn from(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => Session::SignedIn(identity),
            None => Session::SignedOut,
        }
    }
}
