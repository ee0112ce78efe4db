//! Stored-role lookups against the profiles table.

use crate::error::BackendError;
use crate::hosted::{HostedClient, ensure_success, eq_filter, rest_path};
use async_trait::async_trait;
use migrent_access::{AccessError, UserRecordStore};
use migrent_core::BackendConfig;
use reqwest::Method;
use serde_json::Value;

/// The hosted user-record store.
#[derive(Debug, Clone)]
pub struct HostedUserRecords {
    client: HostedClient,
    table: String,
    role_column: String,
}

impl HostedUserRecords {
    pub fn new(client: HostedClient, config: &BackendConfig) -> Self {
        Self {
            client,
            table: config.profiles_table.clone(),
            role_column: config.role_column.clone(),
        }
    }

    fn lookup_path(&self, user_id: &str) -> String {
        let query = format!(
            "{}&select={}",
            eq_filter("id", user_id),
            urlencoding::encode(&self.role_column)
        );
        rest_path(&self.table, &query)
    }

    async fn fetch_role(&self, user_id: &str) -> Result<Option<String>, BackendError> {
        let response = self
            .client
            .request(Method::GET, &self.lookup_path(user_id), None)
            .send()
            .await?;
        let rows: Vec<Value> = ensure_success(response).await?.json().await?;
        role_from_rows(&rows, &self.role_column, user_id)
    }
}

/// Exactly one row is expected; its role column may be null.
fn role_from_rows(rows: &[Value], column: &str, user_id: &str) -> Result<Option<String>, BackendError> {
    match rows {
        [] => Err(BackendError::NotFound(user_id.to_string())),
        [row] => match row.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(role)) => Ok(Some(role.clone())),
            Some(other) => Err(BackendError::parse(format!(
                "{} is not a string: {}",
                column, other
            ))),
        },
        _ => Err(BackendError::parse(format!(
            "{} rows for user '{}'",
            rows.len(),
            user_id
        ))),
    }
}

#[async_trait]
impl UserRecordStore for HostedUserRecords {
    async fn stored_role(&self, user_id: &str) -> Result<Option<String>, AccessError> {
        tracing::debug!(user_id, table = %self.table, "Looking up stored role");
        self.fetch_role(user_id).await.map_err(AccessError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_path() {
        let records = HostedUserRecords::new(
            HostedClient::new("https://abc.example.co", "anon"),
            &BackendConfig::default(),
        );
        assert_eq!(
            records.lookup_path("4f1c"),
            "/rest/v1/profiles?id=eq.4f1c&select=role"
        );
    }

    #[test]
    fn test_single_row() {
        let rows = vec![json!({"role": "superadmin"})];
        assert_eq!(
            role_from_rows(&rows, "role", "u5").unwrap().as_deref(),
            Some("superadmin")
        );
        let rows = vec![json!({"role": null})];
        assert_eq!(role_from_rows(&rows, "role", "u5").unwrap(), None);
    }

    #[test]
    fn test_zero_or_many_rows_fail() {
        assert!(matches!(
            role_from_rows(&[], "role", "u5"),
            Err(BackendError::NotFound(_))
        ));
        let rows = vec![json!({"role": "owner"}), json!({"role": "owner"})];
        assert!(matches!(
            role_from_rows(&rows, "role", "u5"),
            Err(BackendError::Parse(_))
        ));
    }

    #[test]
    fn test_non_string_role_is_malformed() {
        let rows = vec![json!({"role": 3})];
        let err = AccessError::from(role_from_rows(&rows, "role", "u5").unwrap_err());
        assert!(matches!(err, AccessError::Malformed(_)));
    }
}
