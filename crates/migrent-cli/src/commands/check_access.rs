//! `migrent check-access`: run the superadmin gate once from the terminal.

use anyhow::{Result, bail};
use migrent_access::{AccessController, AccessPolicy, AccessState, Identity, RecordingNavigator};
use migrent_backend::{Backend, TokenSession};
use migrent_core::MigrentConfig;
use std::sync::Arc;

/// Outcome of one gate run.
#[derive(Debug)]
pub struct Decision {
    pub state: AccessState,
    pub identity: Option<Identity>,
    pub navigated_to: Option<String>,
}

pub async fn run(
    config: &MigrentConfig,
    token: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let backend = Backend::from_config(config)?;
    let token = match (token, email) {
        (Some(token), _) => Some(token),
        (None, Some(email)) => {
            let password = password.unwrap_or_default();
            Some(backend.auth.sign_in(&email, &password).await?.access_token)
        }
        (None, None) => None,
    };

    let decision = decide(config, &backend, token).await;
    println!("Decision: {}", decision.state);
    if let Some(identity) = &decision.identity {
        println!("  User:       {} ({})", identity.display_name(), identity.id);
        println!(
            "  Role claim: {}",
            identity.role_claim.as_deref().unwrap_or("<none>")
        );
    }
    if let Some(path) = &decision.navigated_to {
        println!("  Navigate:   {}", path);
    }

    if decision.state != AccessState::Granted {
        bail!("access not granted");
    }
    Ok(())
}

async fn decide(config: &MigrentConfig, backend: &Backend, token: Option<String>) -> Decision {
    let policy = AccessPolicy::from_config(&config.access, &config.dashboard);
    let controller = AccessController::new(policy, backend.records.clone());
    let navigator = Arc::new(RecordingNavigator::new());
    let mount = controller.mount(navigator.clone());

    let session = TokenSession::new(backend.auth.clone(), token);
    let state = mount.resolve(&session).await;
    let identity = mount.identity();
    mount.unmount();

    Decision {
        state,
        identity,
        navigated_to: navigator.last(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrent_access::RedirectTarget;

    async fn decide_as(email: Option<&str>) -> Decision {
        let config = MigrentConfig::default();
        let backend = Backend::sample();
        let token = match email {
            Some(email) => Some(backend.auth.sign_in(email, "pw").await.unwrap().access_token),
            None => None,
        };
        decide(&config, &backend, token).await
    }

    #[tokio::test]
    async fn test_superadmin_is_granted() {
        let decision = decide_as(Some("admin@migrent.com.au")).await;
        assert_eq!(decision.state, AccessState::Granted);
        assert_eq!(decision.navigated_to, None);
        assert_eq!(decision.identity.unwrap().id, "u5");
    }

    #[tokio::test]
    async fn test_owner_is_sent_home() {
        let decision = decide_as(Some("bob@outlook.com")).await;
        assert_eq!(decision.state, AccessState::Redirecting(RedirectTarget::Home));
        assert_eq!(decision.navigated_to.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_no_token_is_sent_to_signin() {
        let decision = decide_as(None).await;
        assert_eq!(decision.state, AccessState::Redirecting(RedirectTarget::SignIn));
        assert_eq!(decision.navigated_to.as_deref(), Some("/signin"));
        assert!(decision.identity.is_none());
    }
}
