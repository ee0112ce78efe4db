//! Dashboard configuration.
//!
//! This module defines configuration for the admin dashboard web UI and the
//! access gate in front of it.

use serde::{Deserialize, Serialize};

/// Configuration for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Whether the dashboard is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Host to bind the dashboard to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix of every protected admin route.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Sign-in entry point, target of the unauthenticated redirect.
    #[serde(default = "default_signin_path")]
    pub signin_path: String,

    /// Public home route, target of the unauthorized redirect.
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            signin_path: default_signin_path(),
            home_path: default_home_path(),
        }
    }
}

impl DashboardConfig {
    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Absolute path of an admin page, e.g. `admin_path("users")`.
    pub fn admin_path(&self, page: &str) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), page)
    }
}

/// Configuration for the role-gated admin area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Role an actor must hold to see admin pages.
    #[serde(default = "default_required_role")]
    pub required_role: String,

    /// Redirect unauthorized actors home instead of rendering "Unauthorized".
    #[serde(default = "default_enabled")]
    pub navigate_on_deny: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            required_role: default_required_role(),
            navigate_on_deny: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_path() -> String {
    "/admin".to_string()
}

fn default_signin_path() -> String {
    "/signin".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

fn default_required_role() -> String {
    "superadmin".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_path_joins_prefix() {
        let config = DashboardConfig::default();
        assert_eq!(config.admin_path("users"), "/admin/users");

        let config = DashboardConfig {
            base_path: "/ops/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.admin_path("revenue"), "/ops/revenue");
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(DashboardConfig::default().bind_addr(), "127.0.0.1:8080");
    }
}
