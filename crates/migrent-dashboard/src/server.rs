//! Dashboard server implementation.

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;
use tokio::net::TcpListener;

/// The dashboard server.
pub struct DashboardServer {
    state: AppState,
}

impl DashboardServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Serve until Ctrl-C.
    pub async fn run(&self) -> Result<(), DashboardError> {
        let addr = self.bind_addr();
        tracing::info!(
            address = %addr,
            base_path = %self.state.dashboard().base_path,
            "Starting MigRent dashboard"
        );

        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(format!("bind {}: {}", addr, e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        tracing::info!("Dashboard stopped");
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        self.state.dashboard().bind_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrent_backend::Backend;
    use migrent_core::MigrentConfig;

    #[test]
    fn test_server_creation() {
        let state = AppState::new(MigrentConfig::default(), Backend::sample()).unwrap();
        let server = DashboardServer::new(state);
        assert_eq!(server.bind_addr(), "127.0.0.1:8080");
    }
}
