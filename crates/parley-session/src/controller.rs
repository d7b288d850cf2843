//! The session controller: single writer of [`SessionState`].
//!
//! Identity emissions are applied synchronously inside the provider's
//! listener, each one bumping the state's generation and spawning a profile
//! fetch. A fetch writes its result only while its captured generation is
//! still current and the controller is live. Both checks happen inside
//! `watch::Sender::send_if_modified`, under the same lock as the write, so a
//! late or superseded fetch can never overwrite newer state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use parley_auth::{IdentityListener, IdentitySource, Subscription};
use parley_config::{AuthConfig, PersistencePolicy};
use parley_core::{Identity, Phase, ProfilePatch, SessionState};
use parley_store::{ProfileStore, StoreError};
use tokio::runtime::Handle;
use tokio::sync::{Notify, watch};
use tracing::{debug, error, info, warn};

use crate::error::SessionError;

/// Construction options for [`SessionController::start`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Persistence mode forced on the provider before each credential call.
    pub persistence: PersistencePolicy,
}

impl From<&AuthConfig> for SessionOptions {
    fn from(config: &AuthConfig) -> Self {
        Self {
            persistence: config.persistence,
        }
    }
}

pub struct SessionController {
    inner: Arc<Inner>,
}

struct Inner {
    identity: Arc<dyn IdentitySource>,
    store: Arc<dyn ProfileStore>,
    persistence: PersistencePolicy,
    state: watch::Sender<SessionState>,
    /// Set once by `shutdown`, always from inside `send_if_modified`.
    closed: AtomicBool,
    closed_signal: Notify,
    subscription: Mutex<Option<Subscription>>,
    runtime: Handle,
}

impl SessionController {
    /// Subscribe to `identity` and start reconciling profiles from `store`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoRuntime` when called outside a tokio runtime.
    pub fn start(
        identity: Arc<dyn IdentitySource>,
        store: Arc<dyn ProfileStore>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let runtime = Handle::try_current()?;
        let (state, _) = watch::channel(SessionState::default());
        let inner = Arc::new(Inner {
            identity,
            store,
            persistence: options.persistence,
            state,
            closed: AtomicBool::new(false),
            closed_signal: Notify::new(),
            subscription: Mutex::new(None),
            runtime,
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let listener: IdentityListener = Arc::new(move |identity| {
            if let Some(inner) = weak.upgrade() {
                inner.on_identity(identity);
            }
        });
        let subscription = inner.identity.subscribe(listener);
        *inner.lock_subscription() = Some(subscription);

        debug!(persistence = ?options.persistence, "session controller started");
        Ok(Self { inner })
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait until the provider has reported its first state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ShutDown` if the controller shuts down first.
    pub async fn ready(&self) -> Result<SessionState, SessionError> {
        let closed = self.inner.closed_signal.notified();
        tokio::pin!(closed);
        closed.as_mut().enable();
        self.ensure_live()?;

        let mut receiver = self.inner.state.subscribe();
        tokio::select! {
            ready = receiver.wait_for(SessionState::is_ready) => {
                ready.map(|state| (*state).clone()).map_err(|_| SessionError::ShutDown)
            }
            () = &mut closed => Err(SessionError::ShutDown),
        }
    }

    /// Create an account and set its display name (skipped when blank). The
    /// profile document is not created here; the first profile save does that.
    ///
    /// # Errors
    ///
    /// Credential failures are returned verbatim as `SessionError::Auth`.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, SessionError> {
        self.ensure_live()?;
        self.apply_persistence().await;
        let mut identity = self.inner.identity.create_credential(email, password).await?;
        let display_name = display_name.trim();
        if !display_name.is_empty() {
            self.inner.identity.update_display_name(display_name).await?;
            identity = identity.with_display_name(display_name);
        }
        info!(identity_id = %identity.id, "signed up");
        Ok(identity)
    }

    /// # Errors
    ///
    /// Credential failures are returned verbatim as `SessionError::Auth`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        self.ensure_live()?;
        self.apply_persistence().await;
        let identity = self.inner.identity.authenticate(email, password).await?;
        info!(identity_id = %identity.id, "signed in");
        Ok(identity)
    }

    /// # Errors
    ///
    /// Federated failures (closed popup, network, unavailable provider) are
    /// returned as `SessionError::Auth` and leave the state untouched.
    pub async fn sign_in_with_federated_provider(&self) -> Result<Identity, SessionError> {
        self.ensure_live()?;
        self.apply_persistence().await;
        let identity = self.inner.identity.authenticate_federated().await?;
        info!(identity_id = %identity.id, "signed in with federated provider");
        Ok(identity)
    }

    /// Invalidate the provider session and clear identity and profile before
    /// returning. Local state is cleared even if the provider call fails.
    ///
    /// # Errors
    ///
    /// Returns the provider's failure after clearing local state.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.ensure_live()?;
        let result = self.inner.identity.invalidate().await;
        self.inner.clear_identity();
        info!("signed out");
        result.map_err(Into::into)
    }

    /// Re-fetch the current identity's profile. A no-op when signed out.
    ///
    /// # Errors
    ///
    /// Load failures other than permission denial are recorded on the state
    /// and also returned.
    pub async fn refresh_profile(&self) -> Result<(), SessionError> {
        self.ensure_live()?;
        let Some((identity_id, generation)) = self.inner.begin_refresh() else {
            return Ok(());
        };
        self.inner
            .load_profile(&identity_id, generation)
            .await
            .map_err(Into::into)
    }

    /// Create-or-merge the signed-in user's profile, then refresh.
    ///
    /// Once the write succeeds the save is reported as successful. A failed
    /// reload afterwards is recorded in `profile_error` only.
    ///
    /// # Errors
    ///
    /// `SessionError::NotSignedIn` without a current identity, otherwise the
    /// store's write failure.
    pub async fn save_profile(&self, patch: &ProfilePatch) -> Result<(), SessionError> {
        self.ensure_live()?;
        let identity_id = self
            .inner
            .state
            .borrow()
            .identity_id()
            .map(str::to_string)
            .ok_or(SessionError::NotSignedIn)?;

        self.inner.store.create_or_merge(&identity_id, patch).await?;
        debug!(identity_id = %identity_id, "profile saved");
        if let Err(error) = self.refresh_profile().await {
            warn!(identity_id = %identity_id, %error, "profile saved but reload failed");
        }
        Ok(())
    }

    /// Unsubscribe from the provider. No state changes after this returns,
    /// including from fetches already in flight. Idempotent.
    pub fn shutdown(&self) {
        let inner = &self.inner;
        let mut first = false;
        inner.state.send_if_modified(|_| {
            first = !inner.closed.swap(true, Ordering::SeqCst);
            false
        });
        if !first {
            return;
        }

        let subscription = inner.lock_subscription().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        inner.closed_signal.notify_waiters();
        debug!("session controller shut down");
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.is_shut_down() {
            return Err(SessionError::ShutDown);
        }
        Ok(())
    }

    async fn apply_persistence(&self) {
        let Some(mode) = self.inner.persistence.mode() else {
            return;
        };
        if let Err(error) = self.inner.identity.set_session_persistence(mode).await {
            warn!(%error, %mode, "failed to apply session persistence, continuing");
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Apply one provider emission and kick off its profile fetch.
    fn on_identity(self: &Arc<Self>, identity: Option<Identity>) {
        let mut fetch = None;
        let mut generation = 0;
        let applied = self.state.send_if_modified(|state| {
            if self.is_closed() {
                return false;
            }
            let same_user = matches!(
                (&state.identity, &identity),
                (Some(current), Some(next)) if current.id == next.id
            );
            if !same_user {
                state.profile = None;
                state.profile_error = None;
            }
            state.generation += 1;
            generation = state.generation;
            if state.phase.can_transition_to(Phase::Ready) {
                state.phase = Phase::Ready;
            }
            state.identity.clone_from(&identity);
            fetch = identity.as_ref().map(|identity| identity.id.clone());
            true
        });
        if !applied {
            return;
        }

        debug!(
            identity_id = identity.as_ref().map(|i| i.id.as_str()),
            generation,
            "identity emission applied"
        );

        if let Some(identity_id) = fetch {
            let inner = Arc::clone(self);
            self.runtime.spawn(async move {
                // Failures are already recorded on the state.
                let _ = inner.load_profile(&identity_id, generation).await;
            });
        }
    }

    /// Bump the generation for a refresh of the current identity.
    fn begin_refresh(&self) -> Option<(String, u64)> {
        let mut target = None;
        self.state.send_if_modified(|state| {
            if self.is_closed() {
                return false;
            }
            let Some(identity_id) = state.identity_id().map(str::to_string) else {
                return false;
            };
            state.generation += 1;
            target = Some((identity_id, state.generation));
            true
        });
        target
    }

    fn clear_identity(&self) {
        self.state.send_if_modified(|state| {
            if self.is_closed() {
                return false;
            }
            state.generation += 1;
            state.identity = None;
            state.profile = None;
            state.profile_error = None;
            if state.phase.can_transition_to(Phase::Ready) {
                state.phase = Phase::Ready;
            }
            true
        });
    }

    /// Fetch the profile and apply the outcome if `generation` is current.
    async fn load_profile(&self, identity_id: &str, generation: u64) -> Result<(), StoreError> {
        match self.store.get(identity_id).await {
            Ok(profile) => {
                let found = profile.is_some();
                if self.apply(generation, |state| {
                    state.profile = profile;
                    state.profile_error = None;
                }) {
                    debug!(identity_id, generation, found, "profile loaded");
                }
                Ok(())
            }
            Err(e) if e.is_permission_denied() => {
                if self.apply(generation, |state| {
                    state.profile = None;
                    state.profile_error = None;
                }) {
                    warn!(identity_id, generation, error = %e, "profile read not permitted, treating as absent");
                }
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                if self.apply(generation, |state| state.profile_error = Some(message)) {
                    error!(identity_id, generation, error = %e, "failed to load profile");
                }
                Err(e)
            }
        }
    }

    /// Run `update` only if the controller is live and `generation` is current.
    fn apply(&self, generation: u64, update: impl FnOnce(&mut SessionState)) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if self.is_closed() || state.generation != generation {
                return false;
            }
            update(state);
            true
        });
        if !applied {
            debug!(generation, "discarded stale profile result");
        }
        applied
    }
}
