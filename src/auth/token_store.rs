//! Session token store.
//!
//! Single owner of the access/refresh pair. Every mutation swaps the whole
//! session under one write lock, publishes the new [`SessionState`] on a
//! watch channel, then persists through the injected provider. Mutations
//! are serialized end to end, so the file always ends up matching the last
//! in-memory change. A failed write to disk is logged and the in-memory
//! session stays as set.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::credentials::Credentials;
use super::identity::UserIdentity;
use crate::models::CredentialPair;
use crate::traits::CredentialsProvider;

/// What caused the most recent session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Loaded from persisted credentials at startup
    Restored,
    SignedIn,
    Refreshed,
    SignedOut,
    /// Refresh failed; the user must sign in again
    Expired,
}

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<UserIdentity>,
    pub last_event: Option<SessionEvent>,
}

#[derive(Debug, Default)]
struct Session {
    tokens: Option<CredentialPair>,
    state: SessionState,
    /// Bumped on every change
    generation: u64,
}

pub struct TokenStore {
    session: RwLock<Session>,
    /// Held from the in-memory swap until the provider call returns
    persist_lock: Mutex<()>,
    notifier: watch::Sender<SessionState>,
    provider: Arc<dyn CredentialsProvider>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("state", &self.session())
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Create an empty, unauthenticated store.
    pub fn new(provider: Arc<dyn CredentialsProvider>) -> Self {
        let (notifier, _) = watch::channel(SessionState::default());
        Self {
            session: RwLock::new(Session::default()),
            persist_lock: Mutex::new(()),
            notifier,
            provider,
        }
    }

    /// Create a store seeded from whatever the provider has persisted.
    ///
    /// A file holding only one of the two tokens, or one that cannot be
    /// read, yields an anonymous store.
    pub async fn restore(provider: Arc<dyn CredentialsProvider>) -> Self {
        let persisted = match provider.load().await {
            Ok(creds) => creds,
            Err(e) => {
                warn!("Could not load saved credentials: {}", e);
                None
            }
        };

        let store = Self::new(provider);
        match persisted.as_ref().and_then(Credentials::to_pair) {
            Some(pair) => {
                let user = UserIdentity::from_access_token(&pair.access_token);
                info!(
                    user_id = user.as_ref().map(|u| u.user_id.as_str()).unwrap_or("unknown"),
                    "Restored saved session"
                );
                store.replace(Some(pair), user, SessionEvent::Restored);
            }
            None => {
                if persisted.is_some_and(|c| !c.is_empty()) {
                    warn!("Saved credentials are incomplete, starting signed out");
                }
            }
        }
        store
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(|s| s.tokens.as_ref().map(|t| t.access_token.clone()))
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(|s| s.tokens.as_ref().map(|t| t.refresh_token.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.state.is_authenticated)
    }

    /// Identity decoded from the access token. Untrusted, display only.
    pub fn current_user(&self) -> Option<UserIdentity> {
        self.read(|s| s.state.user.clone())
    }

    /// Snapshot of the current session state.
    pub fn session(&self) -> SessionState {
        self.read(|s| s.state.clone())
    }

    /// Counter that moves on every session change.
    ///
    /// Pass it to [`rotate_session_from`](Self::rotate_session_from) to
    /// drop a refreshed pair if the session changed in the meantime.
    pub fn generation(&self) -> u64 {
        self.read(|s| s.generation)
    }

    /// Receive every session change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.notifier.subscribe()
    }

    /// Store a freshly issued pair after sign-in.
    ///
    /// When `user` is `None` the identity is derived from the access token.
    pub async fn set_session(&self, tokens: CredentialPair, user: Option<UserIdentity>) {
        self.install(tokens, user, SessionEvent::SignedIn).await;
    }

    /// Store a pair obtained from the refresh endpoint.
    pub async fn rotate_session(&self, tokens: CredentialPair) {
        self.install(tokens, None, SessionEvent::Refreshed).await;
    }

    /// Store a refreshed pair only if nothing changed the session since
    /// `generation` was read. Returns `false` when the pair was dropped.
    pub async fn rotate_session_from(&self, generation: u64, tokens: CredentialPair) -> bool {
        let _persist = self.persist_lock.lock().await;
        if self.generation() != generation {
            debug!("Session changed during refresh, dropping refreshed tokens");
            return false;
        }
        self.commit(tokens, None, SessionEvent::Refreshed).await;
        true
    }

    /// Sign out locally and remove persisted tokens.
    pub async fn clear_session(&self) {
        self.remove(SessionEvent::SignedOut).await;
    }

    /// Same as [`clear_session`](Self::clear_session), reported as [`SessionEvent::Expired`].
    pub async fn expire_session(&self) {
        self.remove(SessionEvent::Expired).await;
    }

    async fn install(&self, tokens: CredentialPair, user: Option<UserIdentity>, event: SessionEvent) {
        let _persist = self.persist_lock.lock().await;
        self.commit(tokens, user, event).await;
    }

    async fn commit(&self, tokens: CredentialPair, user: Option<UserIdentity>, event: SessionEvent) {
        let user = user.or_else(|| UserIdentity::from_access_token(&tokens.access_token));
        let persisted = Credentials::from(&tokens);

        info!(
            event = ?event,
            user_id = user.as_ref().map(|u| u.user_id.as_str()).unwrap_or("unknown"),
            "Session updated"
        );
        self.replace(Some(tokens), user, event);

        if let Err(e) = self.provider.save(&persisted).await {
            warn!("Failed to persist session tokens: {}", e);
        }
    }

    async fn remove(&self, event: SessionEvent) {
        let _persist = self.persist_lock.lock().await;
        info!(event = ?event, "Session cleared");
        self.replace(None, None, event);

        if let Err(e) = self.provider.clear().await {
            warn!("Failed to remove persisted session tokens: {}", e);
        }
    }

    fn replace(&self, tokens: Option<CredentialPair>, user: Option<UserIdentity>, event: SessionEvent) {
        let state = SessionState {
            is_authenticated: tokens.is_some(),
            user,
            last_event: Some(event),
        };
        {
            let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
            let generation = session.generation.wrapping_add(1);
            *session = Session {
                tokens,
                state: state.clone(),
                generation,
            };
        }
        debug!(authenticated = state.is_authenticated, "Publishing session state");
        self.notifier.send_replace(state);
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        let session = self.session.read().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }
}
