//! Access states and the policy that drives them.

use migrent_core::{AccessConfig, DashboardConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a redirect sends the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectTarget {
    /// No session: go sign in.
    SignIn,
    /// Signed in but not privileged: go to the public home page.
    Home,
}

/// State of one mount of the gate.
///
/// `Unresolved` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "target")]
pub enum AccessState {
    Unresolved,
    Redirecting(RedirectTarget),
    Granted,
    /// Unauthorized, shown in place instead of navigating away.
    Denied,
}

/// Tri-state summary of an [`AccessState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authorization {
    Pending,
    Granted,
    Denied,
}

impl AccessState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AccessState::Unresolved)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AccessState::Granted)
    }

    pub fn authorization(&self) -> Authorization {
        match self {
            AccessState::Unresolved => Authorization::Pending,
            AccessState::Granted => Authorization::Granted,
            AccessState::Redirecting(_) | AccessState::Denied => Authorization::Denied,
        }
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessState::Unresolved => f.write_str("unresolved"),
            AccessState::Redirecting(RedirectTarget::SignIn) => f.write_str("redirecting to sign-in"),
            AccessState::Redirecting(RedirectTarget::Home) => f.write_str("redirecting home"),
            AccessState::Granted => f.write_str("granted"),
            AccessState::Denied => f.write_str("denied"),
        }
    }
}

/// What the gate requires and where it sends people it turns away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub required_role: String,
    pub signin_path: String,
    pub home_path: String,
    /// Redirect unauthorized actors home; otherwise settle in `Denied`.
    pub navigate_on_deny: bool,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::from_config(&AccessConfig::default(), &DashboardConfig::default())
    }
}

impl AccessPolicy {
    pub fn from_config(access: &AccessConfig, dashboard: &DashboardConfig) -> Self {
        Self {
            required_role: access.required_role.clone(),
            signin_path: dashboard.signin_path.clone(),
            home_path: dashboard.home_path.clone(),
            navigate_on_deny: access.navigate_on_deny,
        }
    }

    pub fn path_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::SignIn => &self.signin_path,
            RedirectTarget::Home => &self.home_path,
        }
    }

    pub(crate) fn matches(&self, role: Option<&str>) -> bool {
        role == Some(self.required_role.as_str())
    }

    /// Terminal state for a valid but unauthorized actor.
    pub(crate) fn unauthorized_state(&self) -> AccessState {
        if self.navigate_on_deny {
            AccessState::Redirecting(RedirectTarget::Home)
        } else {
            AccessState::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_summary() {
        assert_eq!(AccessState::Unresolved.authorization(), Authorization::Pending);
        assert_eq!(AccessState::Granted.authorization(), Authorization::Granted);
        assert_eq!(
            AccessState::Redirecting(RedirectTarget::SignIn).authorization(),
            Authorization::Denied
        );
        assert_eq!(AccessState::Denied.authorization(), Authorization::Denied);
    }

    #[test]
    fn test_policy_defaults() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.required_role, "superadmin");
        assert_eq!(policy.path_for(RedirectTarget::SignIn), "/signin");
        assert_eq!(policy.path_for(RedirectTarget::Home), "/");
        assert_eq!(
            policy.unauthorized_state(),
            AccessState::Redirecting(RedirectTarget::Home)
        );
    }

    #[test]
    fn test_role_match_is_exact() {
        let policy = AccessPolicy::default();
        assert!(policy.matches(Some("superadmin")));
        assert!(!policy.matches(Some("Superadmin")));
        assert!(!policy.matches(None));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AccessState::Redirecting(RedirectTarget::Home).to_string(),
            "redirecting home"
        );
        assert!(!AccessState::Unresolved.is_terminal());
        assert!(AccessState::Denied.is_terminal());
    }
}
