//! Session store: login, registration and logout.
//!
//! DESIGN
//! ======
//! Authentication is simulated: any non-empty credentials succeed after a
//! configurable delay and receive a fabricated token. The store holds the
//! current [`Session`] in a `watch` channel so consumers can subscribe to
//! changes, and writes every transition through a [`SessionStorage`].
//!
//! A transition is persisted before it is published. When the write fails
//! the published session is left as it was and the caller gets a failed
//! [`AuthOutcome`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{BlogConfig, DEFAULT_AUTH_LATENCY_MS};
use crate::storage::{SessionStorage, StorageError};
use crate::types::{AuthOutcome, Session, User};

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

/// Minimum password length in characters for registration.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Fixed id given to every logged-in user.
const LOGIN_USER_ID: u64 = 1;

/// Handle to the authentication state. Clones share the same session.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<Session>>,
    storage: Arc<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    latency: Duration,
}

impl SessionStore {
    /// Create a store, restoring any session previously saved in `storage`.
    ///
    /// A storage entry that cannot be read is logged and treated as empty.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        let restored = match storage.load() {
            Ok(Some(session)) => session.normalized(),
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %e, "persisted session unreadable; starting signed out");
                Session::default()
            }
        };
        debug!(authenticated = restored.authenticated, "session restored");
        let (state, _) = watch::channel(restored);
        Self { state: Arc::new(state), storage, clock, latency: Duration::from_millis(DEFAULT_AUTH_LATENCY_MS) }
    }

    /// Create a store using the simulated latency from `config`.
    #[must_use]
    pub fn from_config(config: &BlogConfig, storage: Arc<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::new(storage, clock).with_latency(config.auth_latency)
    }

    /// Override the simulated login/register round-trip.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Receiver notified on every session transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Sign in with any non-empty credentials.
    ///
    /// The user's display name is the local part of `email`.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        self.simulate_latency().await;

        if email.is_empty() || password.is_empty() {
            debug!("login rejected: missing credentials");
            return AuthOutcome::failed(CREDENTIALS_REQUIRED);
        }

        let user = User { id: LOGIN_USER_ID, email: email.to_owned(), name: email_local_part(email).to_owned() };
        let token = format!("jwt-token-{}", self.clock.now_millis());

        match self.establish(Session::authenticated(user, token)) {
            Ok(()) => {
                info!(email, "logged in");
                AuthOutcome::ok()
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                AuthOutcome::failed(LOGIN_FAILED)
            }
        }
    }

    /// Create an account and sign in.
    ///
    /// All fields must be non-empty and the password at least
    /// [`MIN_PASSWORD_CHARS`] characters.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthOutcome {
        self.simulate_latency().await;

        if name.is_empty() || email.is_empty() || password.is_empty() {
            debug!("registration rejected: missing fields");
            return AuthOutcome::failed(ALL_FIELDS_REQUIRED);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            debug!("registration rejected: short password");
            return AuthOutcome::failed(PASSWORD_TOO_SHORT);
        }

        let now = self.clock.now_millis();
        let user = User { id: now, email: email.to_owned(), name: name.to_owned() };
        let token = format!("mock-jwt-token-{now}");

        match self.establish(Session::authenticated(user, token)) {
            Ok(()) => {
                info!(email, user_id = now, "registered");
                AuthOutcome::ok()
            }
            Err(e) => {
                warn!(error = %e, "registration failed");
                AuthOutcome::failed(REGISTRATION_FAILED)
            }
        }
    }

    /// Clear the session. Always succeeds in memory; a failed write is logged.
    pub fn logout(&self) {
        let cleared = Session::default();
        if let Err(e) = self.storage.save(&cleared) {
            warn!(error = %e, "failed to persist logout");
        }
        self.state.send_replace(cleared);
        info!("logged out");
    }

    /// Whether a user is currently signed in.
    #[must_use]
    pub fn check_auth(&self) -> bool {
        self.state.borrow().authenticated
    }

    fn establish(&self, session: Session) -> Result<(), StorageError> {
        self.storage.save(&session)?;
        self.state.send_replace(session);
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Text before the first `@`, or the whole string when there is none.
#[must_use]
pub fn email_local_part(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
