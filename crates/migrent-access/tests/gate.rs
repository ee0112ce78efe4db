//! Behavioural tests for the access gate against fake collaborators.
//!
//! Run with: cargo test --package migrent-access --test gate

use async_trait::async_trait;
use migrent_access::{
    AccessController, AccessError, AccessPolicy, AccessState, AuthProvider, Identity,
    RecordingNavigator, RedirectTarget, Session, UserRecordStore,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Store answering from a fixed map, counting lookups.
#[derive(Default)]
struct CountingStore {
    roles: HashMap<String, String>,
    calls: AtomicUsize,
}

impl CountingStore {
    fn with(user_id: &str, role: &str) -> Self {
        let mut roles = HashMap::new();
        roles.insert(user_id.to_string(), role.to_string());
        Self {
            roles,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRecordStore for CountingStore {
    async fn stored_role(&self, user_id: &str) -> Result<Option<String>, AccessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.roles.get(user_id).cloned())
    }
}

/// Store whose lookups block until released.
struct GatedStore {
    role: Option<String>,
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
}

impl GatedStore {
    fn new(role: Option<&str>) -> Self {
        Self {
            role: role.map(String::from),
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl UserRecordStore for GatedStore {
    async fn stored_role(&self, _user_id: &str) -> Result<Option<String>, AccessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.role.clone())
    }
}

struct FailingAuth;

#[async_trait]
impl AuthProvider for FailingAuth {
    async fn current_session(&self) -> Result<Session, AccessError> {
        Err(AccessError::Session("connection refused".to_string()))
    }

    async fn sign_out(&self) -> Result<(), AccessError> {
        Ok(())
    }
}

fn signed_in(id: &str, claim: Option<&str>) -> Session {
    let mut identity = Identity::new(id).with_email(format!("{}@migrent.com.au", id));
    identity.role_claim = claim.map(String::from);
    Session::SignedIn(identity)
}

/// Test that a superadmin claim grants without touching the store.
#[tokio::test]
async fn test_claim_grants_without_lookup() {
    let store = Arc::new(CountingStore::default());
    let controller = AccessController::new(AccessPolicy::default(), store.clone());
    let nav = Arc::new(RecordingNavigator::new());

    let state = controller
        .compute_authorization(signed_in("u10", Some("superadmin")), nav.clone())
        .await;

    assert_eq!(state, AccessState::Granted);
    assert_eq!(store.calls(), 0);
    assert!(nav.history().is_empty());
}

/// Test that a missing claim falls back to exactly one store lookup.
#[tokio::test]
async fn test_stored_role_grants_after_one_lookup() {
    let store = Arc::new(CountingStore::with("u10", "superadmin"));
    let controller = AccessController::new(AccessPolicy::default(), store.clone());

    let state = controller
        .compute_authorization(signed_in("u10", None), Arc::new(RecordingNavigator::new()))
        .await;

    assert_eq!(state, AccessState::Granted);
    assert_eq!(store.calls(), 1);
}

/// Test that no identity redirects to sign-in with no lookup.
#[tokio::test]
async fn test_no_identity_redirects_to_signin() {
    let store = Arc::new(CountingStore::default());
    let controller = AccessController::new(AccessPolicy::default(), store.clone());
    let nav = Arc::new(RecordingNavigator::new());

    let state = controller
        .compute_authorization(Session::SignedOut, nav.clone())
        .await;

    assert_eq!(state, AccessState::Redirecting(RedirectTarget::SignIn));
    assert_eq!(store.calls(), 0);
    assert_eq!(nav.history(), vec!["/signin"]);
}

/// Test that a wrong claim and a wrong or absent stored role redirect home.
#[tokio::test]
async fn test_unprivileged_identity_redirects_home() {
    let store = Arc::new(CountingStore::with("u2", "owner"));
    let controller = AccessController::new(AccessPolicy::default(), store.clone());

    for session in [signed_in("u2", Some("owner")), signed_in("u404", Some("seeker"))] {
        let nav = Arc::new(RecordingNavigator::new());
        let state = controller.compute_authorization(session, nav.clone()).await;
        assert_eq!(state, AccessState::Redirecting(RedirectTarget::Home));
        assert_eq!(nav.history(), vec!["/"]);
    }
    assert_eq!(store.calls(), 2);
}

/// Test that a stale claim is overridden by the stored role.
#[tokio::test]
async fn test_stale_claim_overridden_by_store() {
    let store = Arc::new(CountingStore::with("u3", "superadmin"));
    let controller = AccessController::new(AccessPolicy::default(), store.clone());

    let state = controller
        .compute_authorization(signed_in("u3", Some("seeker")), Arc::new(RecordingNavigator::new()))
        .await;
    assert_eq!(state, AccessState::Granted);
}

/// Test that an unmount during the lookup leaves the state untouched.
#[tokio::test]
async fn test_unmount_discards_inflight_lookup() {
    let store = Arc::new(GatedStore::new(Some("superadmin")));
    let controller = AccessController::new(AccessPolicy::default(), store.clone());
    let nav = Arc::new(RecordingNavigator::new());
    let mount = Arc::new(controller.mount(nav.clone()));

    let task = {
        let mount = mount.clone();
        tokio::spawn(async move { mount.update(signed_in("u10", None)).await })
    };
    store.started.notified().await;

    mount.unmount();
    store.release.notify_one();

    assert_eq!(task.await.unwrap(), AccessState::Unresolved);
    assert_eq!(mount.state(), AccessState::Unresolved);
    assert!(nav.history().is_empty());
}

/// Test that a superseded identity's late lookup cannot overwrite the new one.
#[tokio::test]
async fn test_identity_change_discards_old_lookup() {
    let store = Arc::new(GatedStore::new(Some("owner")));
    let controller = AccessController::new(AccessPolicy::default(), store.clone());
    let nav = Arc::new(RecordingNavigator::new());
    let mount = Arc::new(controller.mount(nav.clone()));

    let first = {
        let mount = mount.clone();
        tokio::spawn(async move { mount.update(signed_in("u2", None)).await })
    };
    store.started.notified().await;

    let second = mount.update(signed_in("u10", Some("superadmin"))).await;
    assert_eq!(second, AccessState::Granted);

    store.release.notify_one();
    first.await.unwrap();

    assert_eq!(mount.state(), AccessState::Granted);
    assert_eq!(mount.identity().map(|i| i.id), Some("u10".to_string()));
    assert!(nav.history().is_empty());
}

/// Test that a repeated snapshot for the same identity issues no second lookup.
#[tokio::test]
async fn test_single_lookup_per_identity() {
    let store = Arc::new(GatedStore::new(Some("superadmin")));
    let controller = AccessController::new(AccessPolicy::default(), store.clone());
    let mount = Arc::new(controller.mount(Arc::new(RecordingNavigator::new())));

    let first = {
        let mount = mount.clone();
        tokio::spawn(async move { mount.update(signed_in("u10", None)).await })
    };
    store.started.notified().await;

    assert_eq!(
        mount.update(signed_in("u10", None)).await,
        AccessState::Unresolved
    );

    store.release.notify_one();
    assert_eq!(first.await.unwrap(), AccessState::Granted);
    assert_eq!(mount.settled().await, AccessState::Granted);
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

/// Test that sign-out then sign-in reruns the whole check.
#[tokio::test]
async fn test_sign_out_then_in_reruns_check() {
    let store = Arc::new(CountingStore::with("u10", "superadmin"));
    let controller = AccessController::new(AccessPolicy::default(), store.clone());
    let nav = Arc::new(RecordingNavigator::new());
    let mount = controller.mount(nav.clone());

    assert_eq!(mount.update(signed_in("u10", None)).await, AccessState::Granted);
    assert_eq!(
        mount.update(Session::SignedOut).await,
        AccessState::Redirecting(RedirectTarget::SignIn)
    );
    assert_eq!(mount.update(signed_in("u10", None)).await, AccessState::Granted);
    assert_eq!(store.calls(), 2);
    assert_eq!(nav.history(), vec!["/signin"]);
}

/// Test that a failing auth provider is treated as signed out.
#[tokio::test]
async fn test_session_error_redirects_to_signin() {
    let controller =
        AccessController::new(AccessPolicy::default(), Arc::new(CountingStore::default()));
    let nav = Arc::new(RecordingNavigator::new());
    let mount = controller.mount(nav.clone());

    let state = mount.resolve(&FailingAuth).await;
    assert_eq!(state, AccessState::Redirecting(RedirectTarget::SignIn));
    assert_eq!(nav.last().as_deref(), Some("/signin"));
}
