//! Auth gate: authentication status and sign-in/sign-up/sign-out.
//!
//! Delegates to the auth provider through [`AuthPort`] and keeps the
//! session in [`StoragePort`] so a reload can restore it. With
//! [`AuthGate::with_auto_refresh`] the access token is renewed shortly
//! before it expires, for as long as the session lasts.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chat_types::{
    ChatError, Result,
    event::StoreEvent,
    session::{AuthSession, User},
};
use crate::event_bus::EventBus;
use crate::ports::{AuthPort, StoragePort, TaskSpawner, Timer};

pub const SESSION_STORAGE_KEY: &str = "nhost-auth-session";

/// Renew this long before the access token expires.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);
/// Floor for the refresh delay, for tokens that live shorter than the margin.
pub const MIN_REFRESH_DELAY: Duration = Duration::from_secs(5);
/// Wait before trying again after a network failure.
pub const REFRESH_RETRY_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// Persisted session not checked yet
    Restoring,
    SignedOut,
    SignedIn(AuthSession),
}

struct GateState {
    status: AuthStatus,
    pending: u32,
    /// Bumped on every session change; a scheduled refresh only runs if it
    /// still matches.
    session_seq: u64,
}

struct RefreshScheduler {
    spawner: Rc<dyn TaskSpawner>,
    timer: Rc<dyn Timer>,
}

/// Shared auth state: clone-cheap via Rc.
#[derive(Clone)]
pub struct AuthGate {
    port: Rc<dyn AuthPort>,
    storage: Rc<dyn StoragePort>,
    bus: EventBus,
    state: Rc<RefCell<GateState>>,
    scheduler: Option<Rc<RefreshScheduler>>,
}

/// Marks an auth request in flight for as long as it lives.
struct PendingGuard(Rc<RefCell<GateState>>);

impl PendingGuard {
    fn new(state: &Rc<RefCell<GateState>>) -> Self {
        state.borrow_mut().pending += 1;
        Self(state.clone())
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut s = self.0.borrow_mut();
        s.pending = s.pending.saturating_sub(1);
    }
}

impl AuthGate {
    pub fn new(port: Rc<dyn AuthPort>, storage: Rc<dyn StoragePort>, bus: EventBus) -> Self {
        Self {
            port,
            storage,
            bus,
            state: Rc::new(RefCell::new(GateState {
                status: AuthStatus::Restoring,
                pending: 0,
                session_seq: 0,
            })),
            scheduler: None,
        }
    }

    /// Renew every session before its access token expires.
    pub fn with_auto_refresh(mut self, spawner: Rc<dyn TaskSpawner>, timer: Rc<dyn Timer>) -> Self {
        self.scheduler = Some(Rc::new(RefreshScheduler { spawner, timer }));
        self
    }

    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state.borrow().status, AuthStatus::SignedIn(_))
    }

    /// True until the stored session is checked, and while a request is in flight.
    pub fn is_loading(&self) -> bool {
        let s = self.state.borrow();
        s.status == AuthStatus::Restoring || s.pending > 0
    }

    pub fn current_user(&self) -> Option<User> {
        match &self.state.borrow().status {
            AuthStatus::SignedIn(session) => Some(session.user.clone()),
            _ => None,
        }
    }

    /// Bearer token for backend requests.
    pub fn access_token(&self) -> Option<String> {
        match &self.state.borrow().status {
            AuthStatus::SignedIn(session) => Some(session.access_token.clone()),
            _ => None,
        }
    }

    /// Restore and refresh the persisted session, if any.
    pub async fn restore(&self) -> Option<User> {
        let stored = match self.storage.get(SESSION_STORAGE_KEY).await {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read stored session from {}: {}", self.storage.backend_name(), e);
                None
            }
        };
        let session = stored.and_then(|bytes| match serde_json::from_slice::<AuthSession>(&bytes) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Discarding unreadable stored session: {}", e);
                None
            }
        });

        let Some(session) = session else {
            self.set_session(None);
            return None;
        };

        let refreshed = {
            let _pending = PendingGuard::new(&self.state);
            self.port.refresh(&session.refresh_token).await
        };
        match refreshed {
            Ok(fresh) => {
                log::info!("Session restored for {}", fresh.user.email);
                self.persist(Some(&fresh)).await;
                let user = fresh.user.clone();
                self.set_session(Some(fresh));
                Some(user)
            }
            Err(e) => {
                log::warn!("Stored session could not be refreshed: {}", e);
                self.persist(None).await;
                self.set_session(None);
                None
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let result = self.try_sign_in(email, password).await;
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    async fn try_sign_in(&self, email: &str, password: &str) -> Result<User> {
        let email = validate_credentials(email, password)?;
        let session = {
            let _pending = PendingGuard::new(&self.state);
            self.port.sign_in(email, password).await?
        };
        Ok(self.establish(session).await)
    }

    /// Returns `false` when the account still needs email verification.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<bool> {
        let result = self.try_sign_up(email, password).await;
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    async fn try_sign_up(&self, email: &str, password: &str) -> Result<bool> {
        let email = validate_credentials(email, password)?;
        let session = {
            let _pending = PendingGuard::new(&self.state);
            self.port.sign_up(email, password).await?
        };
        match session {
            Some(session) => {
                self.establish(session).await;
                Ok(true)
            }
            None => {
                log::info!("Sign-up for {} awaits email verification", email);
                self.bus.emit(StoreEvent::SignUpPending { email: email.to_string() });
                Ok(false)
            }
        }
    }

    /// Sign out locally, then tell the provider.
    ///
    /// The local session is dropped even when the provider call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let session = match self.status() {
            AuthStatus::SignedIn(session) => session,
            _ => return Ok(()),
        };
        self.persist(None).await;
        self.set_session(None);

        let result = {
            let _pending = PendingGuard::new(&self.state);
            self.port.sign_out(&session).await
        };
        if let Err(e) = &result {
            log::warn!("Provider sign-out failed: {}", e);
            self.fail(e);
        }
        result
    }

    /// Exchange the current refresh token for a new session.
    ///
    /// A rejected refresh ends the session. A network failure keeps it and,
    /// with auto refresh on, tries again after [`REFRESH_RETRY_DELAY`].
    pub async fn refresh_session(&self) -> Result<User> {
        let (session, seq) = {
            let s = self.state.borrow();
            match &s.status {
                AuthStatus::SignedIn(session) => (session.clone(), s.session_seq),
                _ => return Err(ChatError::Auth("Not signed in".to_string())),
            }
        };

        let result = self.port.refresh(&session.refresh_token).await;
        if self.state.borrow().session_seq != seq {
            log::debug!("Session changed during refresh; discarding the result");
            return result.map(|fresh| fresh.user);
        }

        match result {
            Ok(fresh) => {
                log::debug!("Access token refreshed for {}", fresh.user.email);
                self.persist(Some(&fresh)).await;
                let user = fresh.user.clone();
                self.set_session(Some(fresh));
                Ok(user)
            }
            Err(e) if e.is_transient() => {
                log::warn!("Session refresh failed, retrying: {}", e);
                self.schedule_refresh(seq, REFRESH_RETRY_DELAY);
                Err(e)
            }
            Err(e) => {
                log::warn!("Session refresh rejected, signing out: {}", e);
                self.persist(None).await;
                self.set_session(None);
                self.fail(&e);
                Err(e)
            }
        }
    }

    async fn establish(&self, session: AuthSession) -> User {
        log::info!("Signed in as {}", session.user.email);
        self.persist(Some(&session)).await;
        let user = session.user.clone();
        self.set_session(Some(session));
        user
    }

    fn set_session(&self, session: Option<AuthSession>) {
        let user_id = session.as_ref().map(|s| s.user.id.clone());
        let refresh_in = session.as_ref().and_then(refresh_delay);
        let (changed, seq) = {
            let mut s = self.state.borrow_mut();
            let before = match &s.status {
                AuthStatus::SignedIn(current) => Some(current.user.id.clone()),
                _ => None,
            };
            let was_restoring = s.status == AuthStatus::Restoring;
            s.status = match session {
                Some(session) => AuthStatus::SignedIn(session),
                None => AuthStatus::SignedOut,
            };
            s.session_seq += 1;
            (before != user_id || was_restoring, s.session_seq)
        };
        if let Some(delay) = refresh_in {
            self.schedule_refresh(seq, delay);
        }
        if changed {
            self.bus.emit(StoreEvent::AuthChanged { user_id });
        }
    }

    /// Refresh after `delay` unless the session changes first.
    fn schedule_refresh(&self, seq: u64, delay: Duration) {
        let Some(scheduler) = &self.scheduler else {
            return;
        };
        log::debug!("Session refresh in {}s", delay.as_secs());
        let sleep = scheduler.timer.sleep(delay);
        let gate = self.clone();
        scheduler.spawner.spawn(Box::pin(async move {
            sleep.await;
            if gate.state.borrow().session_seq != seq {
                return;
            }
            // outcomes are logged and published by refresh_session
            let _ = gate.refresh_session().await;
        }));
    }

    async fn persist(&self, session: Option<&AuthSession>) {
        let result = match session {
            Some(session) => match serde_json::to_vec(session) {
                Ok(bytes) => self.storage.set(SESSION_STORAGE_KEY, &bytes).await,
                Err(e) => Err(e.into()),
            },
            None => self.storage.delete(SESSION_STORAGE_KEY).await,
        };
        if let Err(e) = result {
            log::warn!("Could not persist session to {}: {}", self.storage.backend_name(), e);
        }
    }

    fn fail(&self, error: &ChatError) {
        log::error!("Auth error: {}", error);
        self.bus.emit(StoreEvent::AuthFailed { error: error.to_string() });
    }
}

/// How long to wait before renewing `session`; `None` when the provider
/// gave no lifetime.
pub fn refresh_delay(session: &AuthSession) -> Option<Duration> {
    if session.access_token_expires_in == 0 {
        return None;
    }
    let lifetime = Duration::from_secs(session.access_token_expires_in);
    Some(lifetime.saturating_sub(REFRESH_MARGIN).max(MIN_REFRESH_DELAY))
}

/// Check credentials before any request; returns the trimmed email.
pub fn validate_credentials<'a>(email: &'a str, password: &str) -> Result<&'a str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ChatError::Validation("Enter a valid email address".to_string()));
    }
    if password.is_empty() {
        return Err(ChatError::Validation("Password cannot be empty".to_string()));
    }
    Ok(email)
}
