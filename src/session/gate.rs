use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use super::model::{CachedProfile, Session};
use super::store::SessionStore;
use crate::nav::Root;
use crate::utils::{Result, ShelterError};

/// What the gate currently believes about the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// The stored session has not been read yet
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl GateState {
    fn from_session(session: Session) -> Self {
        if session.is_present() {
            Self::Authenticated(session)
        } else {
            Self::Unauthenticated
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Which root this state mounts
    pub fn root(&self) -> Root {
        match self {
            Self::Loading => Root::Splash,
            Self::Authenticated(_) => Root::Authenticated,
            Self::Unauthenticated => Root::Auth,
        }
    }
}

/// Single authoritative decision of which root to present
///
/// The gate owns the only write path to the session store. Everything else
/// observes it through a [`GateView`]. Mutations are applied one at a time and
/// the published state changes only after the store write has completed.
pub struct AuthGate {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<GateState>,
    mutation: Mutex<()>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(GateState::Loading);
        Self {
            store,
            state,
            mutation: Mutex::new(()),
        }
    }

    /// Read the stored session and leave `Loading`
    ///
    /// Only the first call reads the store. Later calls return the current
    /// state unchanged.
    pub async fn bootstrap(&self) -> GateState {
        let _guard = self.mutation.lock().await;

        let current = self.state.borrow().clone();
        if !current.is_loading() {
            debug!("auth gate already resolved");
            return current;
        }

        let next = GateState::from_session(self.store.get().await);
        info!(root = ?next.root(), "auth gate resolved");
        self.state.send_replace(next.clone());
        next
    }

    /// Persist `session`, then switch to `Authenticated`
    pub(crate) async fn sign_in(&self, session: Session) -> Result<()> {
        let session = session.normalized();
        if !session.is_present() {
            return Err(ShelterError::Session(
                "cannot sign in without a user id or token".to_string(),
            ));
        }

        let _guard = self.mutation.lock().await;
        self.ensure_ready()?;

        self.store.set(&session).await?;
        info!(user_id = ?session.user_id(), "signed in");
        self.state.send_replace(GateState::Authenticated(session));
        Ok(())
    }

    /// Clear the stored session, then switch to `Unauthenticated`
    pub(crate) async fn sign_out(&self) -> Result<()> {
        let _guard = self.mutation.lock().await;
        self.ensure_ready()?;

        self.store.clear().await?;
        info!("signed out");
        self.state.send_replace(GateState::Unauthenticated);
        Ok(())
    }

    /// Remember the signed-in user's profile next to the session
    pub(crate) async fn cache_profile(&self, profile: &CachedProfile) -> Result<()> {
        let _guard = self.mutation.lock().await;
        if self.state.borrow().session().is_none() {
            return Err(ShelterError::Session("no active session".to_string()));
        }
        self.store.set_profile(profile).await
    }

    /// Profile cached at the last login, if any
    pub async fn cached_profile(&self) -> Option<CachedProfile> {
        self.store.profile().await
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state.borrow().is_loading() {
            return Err(ShelterError::Session(
                "the stored session has not been read yet".to_string(),
            ));
        }
        Ok(())
    }

    /// Current state snapshot
    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    pub fn root(&self) -> Root {
        self.state.borrow().root()
    }

    /// Read-only handle for consumers
    pub fn view(&self) -> GateView {
        GateView {
            rx: self.state.subscribe(),
        }
    }
}

/// Read-only, eventually consistent view of the gate
#[derive(Clone)]
pub struct GateView {
    rx: watch::Receiver<GateState>,
}

impl GateView {
    pub fn state(&self) -> GateState {
        self.rx.borrow().clone()
    }

    pub fn root(&self) -> Root {
        self.rx.borrow().root()
    }

    pub fn session(&self) -> Option<Session> {
        self.rx.borrow().session().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.rx
            .borrow()
            .session()
            .and_then(|s| s.token.clone())
    }

    pub fn user_id(&self) -> Option<String> {
        self.rx
            .borrow()
            .session()
            .and_then(|s| s.user_id.clone())
    }

    /// Wait for the next published state
    pub async fn changed(&mut self) -> Result<GateState> {
        self.rx
            .changed()
            .await
            .map_err(|_| ShelterError::Session("auth gate was dropped".to_string()))?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Wait until the gate has left `Loading`
    pub async fn ready(&mut self) -> Result<GateState> {
        let state = self
            .rx
            .wait_for(|s| !s.is_loading())
            .await
            .map_err(|_| ShelterError::Session("auth gate was dropped".to_string()))?;
        Ok(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemorySessionStore, MockSessionStore};
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(Some("42".into()), Some("abc".into()))
    }

    #[tokio::test]
    async fn test_starts_loading_on_splash() {
        let gate = AuthGate::new(Arc::new(MemorySessionStore::new()));
        assert_eq!(gate.state(), GateState::Loading);
        assert_eq!(gate.root(), Root::Splash);
    }

    #[tokio::test]
    async fn test_bootstrap_with_stored_session() {
        let gate = AuthGate::new(Arc::new(MemorySessionStore::with_session(session())));
        assert_eq!(gate.bootstrap().await, GateState::Authenticated(session()));
        assert_eq!(gate.root(), Root::Authenticated);
    }

    #[tokio::test]
    async fn test_bootstrap_without_session() {
        let gate = AuthGate::new(Arc::new(MemorySessionStore::new()));
        assert_eq!(gate.bootstrap().await, GateState::Unauthenticated);
        assert_eq!(gate.root(), Root::Auth);
    }

    #[tokio::test]
    async fn test_bootstrap_reads_store_once() {
        let mut store = MockSessionStore::new();
        store
            .expect_get()
            .times(1)
            .returning(Session::default);

        let gate = AuthGate::new(Arc::new(store));
        gate.bootstrap().await;
        assert_eq!(gate.bootstrap().await, GateState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_mutations_rejected_while_loading() {
        let mut store = MockSessionStore::new();
        store.expect_set().never();
        store.expect_clear().never();

        let gate = AuthGate::new(Arc::new(store));
        assert!(gate.sign_in(session()).await.is_err());
        assert!(gate.sign_out().await.is_err());
        assert!(gate.state().is_loading());
    }

    #[tokio::test]
    async fn test_sign_in_rejects_empty_session() {
        let gate = AuthGate::new(Arc::new(MemorySessionStore::new()));
        gate.bootstrap().await;
        assert!(gate.sign_in(Session::default()).await.is_err());
        assert_eq!(gate.root(), Root::Auth);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_state() {
        let mut store = MockSessionStore::new();
        store.expect_get().returning(Session::default);
        store
            .expect_set()
            .times(1)
            .returning(|_| Err(ShelterError::Storage("disk full".into())));

        let gate = AuthGate::new(Arc::new(store));
        gate.bootstrap().await;

        let err = gate.sign_in(session()).await.unwrap_err();
        assert!(matches!(err, ShelterError::Storage(_)));
        assert_eq!(gate.state(), GateState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_failed_clear_keeps_session() {
        let mut store = MockSessionStore::new();
        store.expect_get().returning(session);
        store
            .expect_clear()
            .returning(|| Err(ShelterError::Storage("read-only".into())));

        let gate = AuthGate::new(Arc::new(store));
        gate.bootstrap().await;

        assert!(gate.sign_out().await.is_err());
        assert_eq!(gate.state(), GateState::Authenticated(session()));
    }

    #[tokio::test]
    async fn test_sign_in_and_out_cycle() {
        let store = Arc::new(MemorySessionStore::new());
        let gate = AuthGate::new(store.clone());
        gate.bootstrap().await;

        gate.sign_in(session()).await.unwrap();
        assert_eq!(store.get().await, session());
        assert_eq!(gate.root(), Root::Authenticated);

        gate.sign_out().await.unwrap();
        assert!(!store.get().await.is_present());
        assert_eq!(gate.root(), Root::Auth);
    }

    #[tokio::test]
    async fn test_cache_profile_needs_session() {
        let gate = AuthGate::new(Arc::new(MemorySessionStore::new()));
        gate.bootstrap().await;
        let profile = CachedProfile {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            address: "Calle 1".into(),
        };
        assert!(gate.cache_profile(&profile).await.is_err());

        gate.sign_in(session()).await.unwrap();
        gate.cache_profile(&profile).await.unwrap();
        assert_eq!(gate.cached_profile().await, Some(profile));
    }

    #[tokio::test]
    async fn test_view_follows_mutations() {
        let gate = AuthGate::new(Arc::new(MemorySessionStore::new()));
        let mut view = gate.view();
        assert_eq!(view.root(), Root::Splash);

        gate.bootstrap().await;
        assert_eq!(view.ready().await.unwrap(), GateState::Unauthenticated);

        gate.sign_in(session()).await.unwrap();
        assert_eq!(view.changed().await.unwrap(), GateState::Authenticated(session()));
        assert_eq!(view.token().as_deref(), Some("abc"));
        assert_eq!(view.user_id().as_deref(), Some("42"));
    }
}
