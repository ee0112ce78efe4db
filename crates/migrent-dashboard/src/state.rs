//! Dashboard application state.

use crate::error::DashboardError;
use crate::tables::Tables;
use migrent_access::{AccessController, AccessPolicy, Identity};
use migrent_backend::{AdminRepository, Backend, Caller};
use migrent_core::{DashboardConfig, MigrentConfig};
use std::sync::Arc;

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MigrentConfig,
    backend: Backend,
    access: AccessController,
    tables: Tables,
}

impl AppState {
    /// Wire the state from configuration and an already-built backend.
    pub fn new(config: MigrentConfig, backend: Backend) -> Result<Self, DashboardError> {
        let policy = AccessPolicy::from_config(&config.access, &config.dashboard);
        let access = AccessController::new(policy, backend.records.clone());
        let tables = Tables::new(&config.dashboard.base_path)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                access,
                tables,
            }),
        })
    }

    pub fn config(&self) -> &MigrentConfig {
        &self.inner.config
    }

    pub fn dashboard(&self) -> &DashboardConfig {
        &self.inner.config.dashboard
    }

    pub fn backend(&self) -> &Backend {
        &self.inner.backend
    }

    pub fn access(&self) -> &AccessController {
        &self.inner.access
    }

    pub fn tables(&self) -> &Tables {
        &self.inner.tables
    }

    /// Absolute path of an admin page.
    pub fn admin_path(&self, page: &str) -> String {
        self.inner.config.dashboard.admin_path(page)
    }
}

/// The granted actor of an admin request, inserted by the access middleware.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub access_token: String,
    pub identity: Identity,
}

impl AdminSession {
    pub fn caller(&self) -> Caller {
        Caller::new(&self.access_token, &self.identity.id)
    }

    pub fn display_name(&self) -> &str {
        self.identity.display_name()
    }

    /// Repository acting for this admin.
    pub fn repository(&self, state: &AppState) -> Arc<dyn AdminRepository> {
        state.backend().repository(Some(&self.access_token))
    }
}
