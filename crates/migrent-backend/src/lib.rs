//! Backend adapters for the MigRent admin dashboard.
//!
//! Two implementations sit behind each seam:
//!
//! | Seam | Hosted | Sample |
//! |------|--------|--------|
//! | [`SessionAuth`] | [`HostedAuth`] (`/auth/v1`) | [`SampleAuth`] |
//! | [`UserRecordStore`](migrent_access::UserRecordStore) | [`HostedUserRecords`] | [`SampleRepository`] |
//! | [`AdminRepository`] | [`HostedRepository`] (`/rest/v1`) | [`SampleRepository`] |
//! | [`ReportStore`] | [`ReportsApi`] | [`SampleReportStore`] |
//!
//! [`Backend::from_config`] picks one side according to `data_source`.

pub mod auth;
pub mod error;
pub mod hosted;
pub mod records;
pub mod reports;
pub mod repository;
pub mod sample;

pub use auth::{HostedAuth, SessionAuth, SignedIn, TokenSession};
pub use error::BackendError;
pub use hosted::HostedClient;
pub use records::HostedUserRecords;
pub use reports::{Caller, LIST_LIMIT, ReportStore, ReportsApi, SubmitReceipt};
pub use repository::{AdminRepository, HostedRepository};
pub use sample::{SampleAuth, SampleReportStore, SampleRepository};

use migrent_access::UserRecordStore;
use migrent_core::{DataSource, MigrentConfig};
use std::sync::Arc;

#[derive(Clone)]
enum Repositories {
    Shared(Arc<dyn AdminRepository>),
    Hosted(HostedRepository),
}

/// Every collaborator the dashboard needs, wired from one configuration.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn SessionAuth>,
    pub records: Arc<dyn UserRecordStore>,
    pub reports: Arc<dyn ReportStore>,
    repositories: Repositories,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.repositories {
            Repositories::Shared(_) => "shared",
            Repositories::Hosted(_) => "hosted",
        };
        f.debug_struct("Backend")
            .field("repositories", &source)
            .finish_non_exhaustive()
    }
}

impl Backend {
    pub fn from_config(config: &MigrentConfig) -> Result<Self, BackendError> {
        match config.data_source {
            DataSource::Sample => Ok(Self::sample()),
            DataSource::Backend => {
                let client = HostedClient::from_config(&config.backend)?;
                tracing::info!(url = %client.base_url(), "Using hosted backend");
                Ok(Self {
                    auth: Arc::new(HostedAuth::new(client.clone())),
                    records: Arc::new(HostedUserRecords::new(client.clone(), &config.backend)),
                    reports: Arc::new(ReportsApi::from_config(&config.api)),
                    repositories: Repositories::Hosted(HostedRepository::new(client)),
                })
            }
        }
    }

    /// Seeded in-memory backend.
    pub fn sample() -> Self {
        let repository = SampleRepository::seeded();
        tracing::info!("Using in-memory sample data");
        Self {
            auth: Arc::new(SampleAuth::new(repository.clone())),
            records: Arc::new(repository.clone()),
            reports: Arc::new(SampleReportStore::seeded()),
            repositories: Repositories::Shared(Arc::new(repository)),
        }
    }

    /// Assemble from explicit parts; every caller shares `repository`.
    pub fn with_parts(
        auth: Arc<dyn SessionAuth>,
        records: Arc<dyn UserRecordStore>,
        repository: Arc<dyn AdminRepository>,
        reports: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            auth,
            records,
            reports,
            repositories: Repositories::Shared(repository),
        }
    }

    /// Repository acting for the holder of `token`.
    pub fn repository(&self, token: Option<&str>) -> Arc<dyn AdminRepository> {
        match (&self.repositories, token) {
            (Repositories::Shared(repo), _) => repo.clone(),
            (Repositories::Hosted(repo), Some(token)) => Arc::new(repo.with_bearer(token)),
            (Repositories::Hosted(repo), None) => Arc::new(repo.clone()),
        }
    }
}
