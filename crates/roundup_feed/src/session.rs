use std::sync::Mutex;

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(User),
}

type PendingAction = Box<dyn FnOnce() + Send>;

/// Gate around the external identity provider. `require_auth` runs an
/// action immediately when a user is signed in; otherwise it parks the
/// action in a single slot until the next sign-in fires it, a one-shot
/// continuation. A newer deferred action replaces an older one.
pub struct SessionGate {
    pending: Mutex<Option<PendingAction>>,
    tx: watch::Sender<AuthState>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::SignedOut);
        Self {
            pending: Mutex::new(None),
            tx,
        }
    }

    pub fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        match self.state() {
            AuthState::SignedIn(user) => Some(user),
            AuthState::SignedOut => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn require_auth(&self, action: impl FnOnce() + Send + 'static) {
        if self.current_user().is_some() {
            action();
            return;
        }
        debug!("action deferred until sign-in");
        *self.pending.lock().unwrap() = Some(Box::new(action));
    }

    /// External sign-in completed: publish the transition and run the
    /// deferred action, if any, exactly once.
    pub fn set_signed_in(&self, user: User) {
        self.tx.send_replace(AuthState::SignedIn(user));
        if let Some(action) = self.pending.lock().unwrap().take() {
            action();
        }
    }

    /// Signing out drops any still-pending action.
    pub fn sign_out(&self) {
        self.tx.send_replace(AuthState::SignedOut);
        *self.pending.lock().unwrap() = None;
    }
}
