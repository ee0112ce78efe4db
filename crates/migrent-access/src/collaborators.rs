//! External collaborators of the access controller.
//!
//! | Trait | Provides |
//! |-------|----------|
//! | [`AuthProvider`] | current session, sign-out |
//! | [`UserRecordStore`] | stored role by account id |
//! | [`Navigator`] | "navigate to path" |

use crate::error::AccessError;
use crate::identity::Session;
use async_trait::async_trait;
use std::sync::Mutex;

/// Source of the current session.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the current session.
    async fn current_session(&self) -> Result<Session, AccessError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AccessError>;
}

/// System of record for account roles.
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    /// Stored role of `user_id`, `None` when the record has no role.
    async fn stored_role(&self, user_id: &str) -> Result<Option<String>, AccessError>;
}

/// Router boundary.
///
/// Called while the mount's state is locked, so implementations must not
/// call back into the mount.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that remembers requested paths instead of acting on them.
///
/// A request handler reads [`RecordingNavigator::last`] after the check and
/// turns it into an HTTP redirect.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent navigation request.
    pub fn last(&self) -> Option<String> {
        self.paths
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Every navigation request, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigation requested");
        self.paths
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator_keeps_order() {
        let nav = RecordingNavigator::new();
        assert_eq!(nav.last(), None);
        nav.navigate("/signin");
        nav.navigate("/");
        assert_eq!(nav.last().as_deref(), Some("/"));
        assert_eq!(nav.history(), vec!["/signin", "/"]);
    }
}
