//! `migrent serve`: run the admin dashboard.

use anyhow::{Context, Result, bail};
use migrent_backend::Backend;
use migrent_core::MigrentConfig;
use migrent_dashboard::{AppState, DashboardServer};

pub async fn run(mut config: MigrentConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.dashboard.host = host;
    }
    if let Some(port) = port {
        config.dashboard.port = port;
    }
    if !config.dashboard.enabled {
        bail!("dashboard.enabled is false; nothing to serve");
    }

    let backend = Backend::from_config(&config).context("failed to configure backend")?;
    tracing::info!(
        data_source = config.data_source.as_str(),
        required_role = %config.access.required_role,
        "Backend ready"
    );

    let state = AppState::new(config, backend)?;
    DashboardServer::new(state).run().await?;
    Ok(())
}
