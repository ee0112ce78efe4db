//! The access controller and its per-mount gate.
//!
//! ## Algorithm
//!
//! Run on every session change observed by a [`Mount`]:
//!
//! 1. `Loading`: stay where we are; no redirect.
//! 2. Signed out: `Redirecting(SignIn)`.
//! 3. Signed in with a role claim equal to the required role: `Granted`,
//!    no I/O.
//! 4. Otherwise one lookup against the [`UserRecordStore`]. A matching
//!    stored role grants; a different or absent role, or any lookup error,
//!    is unauthorized (`Redirecting(Home)`, or `Denied` when the policy
//!    does not navigate).
//!
//! A new identity bumps the mount's generation and cancels the lookup of
//! the previous one. A lookup result is applied only if its generation is
//! still current and the mount is still mounted.

use crate::collaborators::{AuthProvider, Navigator, UserRecordStore};
use crate::identity::{Identity, Session};
use crate::state::{AccessPolicy, AccessState, RedirectTarget};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Factory for per-mount gates sharing one policy and one record store.
#[derive(Clone)]
pub struct AccessController {
    policy: Arc<AccessPolicy>,
    store: Arc<dyn UserRecordStore>,
}

impl std::fmt::Debug for AccessController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessController")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AccessController {
    pub fn new(policy: AccessPolicy, store: Arc<dyn UserRecordStore>) -> Self {
        Self {
            policy: Arc::new(policy),
            store,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Start a fresh gate in `Unresolved`.
    pub fn mount(&self, navigator: Arc<dyn Navigator>) -> Mount {
        Mount::new(self.policy.clone(), self.store.clone(), navigator)
    }

    /// Mount, apply one session snapshot, return the state it settles in.
    pub async fn compute_authorization(
        &self,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> AccessState {
        self.mount(navigator).update(session).await
    }
}

struct Inner {
    /// Identity the current state was computed for; `None` when signed out.
    identity: Option<Identity>,
    /// A non-loading session has been applied.
    resolved: bool,
    generation: u64,
    lookup_issued: bool,
    lookup_cancel: CancellationToken,
}

enum Step {
    Unchanged,
    Settled,
    Lookup {
        generation: u64,
        user_id: String,
        cancel: CancellationToken,
    },
}

/// One gate instance, alive for one page lifecycle.
///
/// Dropping the mount unmounts it.
pub struct Mount {
    policy: Arc<AccessPolicy>,
    store: Arc<dyn UserRecordStore>,
    navigator: Arc<dyn Navigator>,
    inner: Mutex<Inner>,
    state: watch::Sender<AccessState>,
    unmounted: CancellationToken,
}

impl Mount {
    fn new(
        policy: Arc<AccessPolicy>,
        store: Arc<dyn UserRecordStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let unmounted = CancellationToken::new();
        let (state, _) = watch::channel(AccessState::Unresolved);
        Self {
            policy,
            store,
            navigator,
            inner: Mutex::new(Inner {
                identity: None,
                resolved: false,
                generation: 0,
                lookup_issued: false,
                lookup_cancel: unmounted.child_token(),
            }),
            state,
            unmounted,
        }
    }

    pub fn state(&self) -> AccessState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AccessState> {
        self.state.subscribe()
    }

    /// Identity the current state belongs to.
    pub fn identity(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted.is_cancelled()
    }

    /// Stop applying results. Any in-flight lookup is abandoned.
    pub fn unmount(&self) {
        if !self.unmounted.is_cancelled() {
            tracing::debug!(state = %self.state(), "Unmounting access gate");
            self.unmounted.cancel();
        }
    }

    /// Resolve the session through `auth` and apply it.
    ///
    /// A session that cannot be resolved counts as signed out.
    pub async fn resolve(&self, auth: &dyn AuthProvider) -> AccessState {
        let session = match auth.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Session resolution failed, treating as signed out");
                Session::SignedOut
            }
        };
        self.update(session).await
    }

    /// Apply one session snapshot and return the resulting state.
    ///
    /// Awaits the authoritative lookup when one is needed. When the same
    /// identity is already being checked, returns the current state
    /// without a second lookup; use [`Mount::settled`] to wait for it.
    pub async fn update(&self, session: Session) -> AccessState {
        if !self.is_mounted() {
            tracing::debug!("Ignoring session change after unmount");
            return self.state();
        }

        let identity = match session {
            Session::Loading => return self.state(),
            Session::SignedOut => None,
            Session::SignedIn(identity) => Some(identity),
        };

        match self.begin(identity) {
            Step::Unchanged | Step::Settled => self.state(),
            Step::Lookup {
                generation,
                user_id,
                cancel,
            } => self.lookup(generation, &user_id, cancel).await,
        }
    }

    /// Wait until the state is terminal or the mount goes away.
    pub async fn settled(&self) -> AccessState {
        let mut rx = self.subscribe();
        tokio::select! {
            _ = self.unmounted.cancelled() => {}
            _ = rx.wait_for(AccessState::is_terminal) => {}
        }
        self.state()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, identity: Option<Identity>) -> Step {
        let mut inner = self.lock();

        if inner.resolved && inner.identity == identity {
            return Step::Unchanged;
        }

        inner.resolved = true;
        inner.generation += 1;
        inner.lookup_cancel.cancel();
        inner.lookup_cancel = self.unmounted.child_token();
        inner.lookup_issued = false;
        inner.identity = identity.clone();
        self.state.send_replace(AccessState::Unresolved);

        let Some(identity) = identity else {
            tracing::info!("No session, redirecting to sign-in");
            self.settle(AccessState::Redirecting(RedirectTarget::SignIn));
            return Step::Settled;
        };

        if self.policy.matches(identity.role_claim.as_deref()) {
            tracing::info!(
                user_id = %identity.id,
                "Access granted from session role claim"
            );
            self.settle(AccessState::Granted);
            return Step::Settled;
        }

        tracing::debug!(
            user_id = %identity.id,
            role_claim = ?identity.role_claim,
            "Role claim does not match, looking up stored role"
        );
        inner.lookup_issued = true;
        Step::Lookup {
            generation: inner.generation,
            user_id: identity.id,
            cancel: inner.lookup_cancel.clone(),
        }
    }

    async fn lookup(&self, generation: u64, user_id: &str, cancel: CancellationToken) -> AccessState {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(user_id, generation, "Role lookup abandoned");
                return self.state();
            }
            result = self.store.stored_role(user_id) => result,
        };

        let inner = self.lock();
        if inner.generation != generation || !self.is_mounted() {
            tracing::debug!(user_id, generation, "Discarding late role lookup result");
            return self.state();
        }

        let next = match result {
            Ok(role) if self.policy.matches(role.as_deref()) => {
                tracing::info!(user_id, "Access granted from stored role");
                AccessState::Granted
            }
            Ok(role) => {
                tracing::info!(user_id, stored_role = ?role, "Access denied: role does not match");
                self.policy.unauthorized_state()
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Role lookup failed, denying access");
                self.policy.unauthorized_state()
            }
        };
        self.settle(next);
        drop(inner);
        next
    }

    /// Publish a terminal state. Caller holds the inner lock.
    fn settle(&self, state: AccessState) {
        self.state.send_replace(state);
        if let AccessState::Redirecting(target) = state {
            self.navigator.navigate(self.policy.path_for(target));
        }
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.unmounted.cancel();
    }
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("state", &self.state())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::RecordingNavigator;
    use crate::error::AccessError;
    use async_trait::async_trait;

    struct FixedStore(Result<Option<String>, AccessError>);

    #[async_trait]
    impl UserRecordStore for FixedStore {
        async fn stored_role(&self, _user_id: &str) -> Result<Option<String>, AccessError> {
            self.0.clone()
        }
    }

    fn controller(store: FixedStore) -> AccessController {
        AccessController::new(AccessPolicy::default(), Arc::new(store))
    }

    #[tokio::test]
    async fn test_loading_stays_unresolved_without_navigation() {
        let nav = Arc::new(RecordingNavigator::new());
        let mount = controller(FixedStore(Ok(None))).mount(nav.clone());
        assert_eq!(mount.update(Session::Loading).await, AccessState::Unresolved);
        assert_eq!(nav.last(), None);
    }

    #[tokio::test]
    async fn test_lookup_error_fails_closed() {
        let nav = Arc::new(RecordingNavigator::new());
        let mount = controller(FixedStore(Err(AccessError::Lookup("timeout".into()))))
            .mount(nav.clone());
        let state = mount.update(Session::SignedIn(Identity::new("u1"))).await;
        assert_eq!(state, AccessState::Redirecting(RedirectTarget::Home));
        assert_eq!(nav.last().as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_denied_without_navigation_when_configured() {
        let policy = AccessPolicy {
            navigate_on_deny: false,
            ..AccessPolicy::default()
        };
        let nav = Arc::new(RecordingNavigator::new());
        let controller = AccessController::new(policy, Arc::new(FixedStore(Ok(Some("owner".into())))));
        let state = controller
            .compute_authorization(Session::SignedIn(Identity::new("u2")), nav.clone())
            .await;
        assert_eq!(state, AccessState::Denied);
        assert_eq!(nav.last(), None);
    }

    #[tokio::test]
    async fn test_update_after_unmount_is_ignored() {
        let nav = Arc::new(RecordingNavigator::new());
        let mount = controller(FixedStore(Ok(None))).mount(nav.clone());
        mount.unmount();
        assert_eq!(mount.update(Session::SignedOut).await, AccessState::Unresolved);
        assert!(nav.history().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_identical_session_is_unchanged() {
        let nav = Arc::new(RecordingNavigator::new());
        let mount = controller(FixedStore(Ok(None))).mount(nav.clone());
        mount.update(Session::SignedOut).await;
        mount.update(Session::SignedOut).await;
        assert_eq!(nav.history(), vec!["/signin"]);
    }
}
