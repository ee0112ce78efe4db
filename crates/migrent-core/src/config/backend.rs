//! External service configuration.
//!
//! The hosted backend provides auth and the user-record store; the REST API
//! server owns report management.

use serde::{Deserialize, Serialize};

/// Hosted auth + Postgres service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: Option<String>,

    /// Public anon key sent as the `apikey` header.
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Environment variable containing the anon key.
    #[serde(default)]
    pub anon_key_env: Option<String>,

    /// Table holding one row per account with its stored role.
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,

    /// Column of `profiles_table` holding the role.
    #[serde(default = "default_role_column")]
    pub role_column: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            anon_key_env: None,
            profiles_table: default_profiles_table(),
            role_column: default_role_column(),
        }
    }
}

impl BackendConfig {
    /// Get the anon key, checking anon_key_env first.
    pub fn get_anon_key(&self) -> Option<String> {
        if let Some(env_var) = &self.anon_key_env
            && let Ok(key) = std::env::var(env_var)
        {
            return Some(key);
        }
        self.anon_key.clone()
    }

    /// Project URL without a trailing slash.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(|u| u.trim_end_matches('/'))
    }
}

/// Report management REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API server.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
        }
    }
}

fn default_profiles_table() -> String {
    "profiles".to_string()
}

fn default_role_column() -> String {
    "role".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = BackendConfig {
            url: Some("https://abc.example.co/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), Some("https://abc.example.co"));
    }

    #[test]
    fn test_anon_key_falls_back_to_inline() {
        let config = BackendConfig {
            anon_key: Some("inline".to_string()),
            anon_key_env: Some("MIGRENT_TEST_UNSET_ANON_KEY".to_string()),
            ..Default::default()
        };
        assert_eq!(config.get_anon_key().as_deref(), Some("inline"));
    }
}
