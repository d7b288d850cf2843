//! Test doubles for the controller's two ports.
//!
//! `ScriptedIdentity` emits exactly what a test tells it to and records every
//! call. `GatedStore` wraps a `MemoryProfileStore` and lets a test hold the
//! next read of an id until it supplies the result, so fetch completion order
//! is under the test's control.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parley_auth::{
    AuthError, FederatedAuthError, IdentityListener, IdentitySource, Subscription,
};
use parley_core::{Identity, PersistenceMode, Profile, ProfilePatch, ProfilePatchBuilder};
use parley_store::{Clock, MemoryProfileStore, ProfileStore, StoreError};
use tokio::sync::{mpsc, oneshot};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScriptState {
    current: Option<Identity>,
    listeners: Vec<(u64, IdentityListener)>,
    next_id: u64,
    calls: Vec<String>,
}

pub struct ScriptedIdentity {
    state: Arc<Mutex<ScriptState>>,
    emit_on_subscribe: bool,
    emit_on_invalidate: AtomicBool,
    fail_persistence: AtomicBool,
}

impl ScriptedIdentity {
    /// Reports "no identity" to each new listener, like a real provider.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(true))
    }

    /// Never reports on subscribe; the test decides when the first emission
    /// happens.
    pub fn silent() -> Arc<Self> {
        Arc::new(Self::build(false))
    }

    fn build(emit_on_subscribe: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState::default())),
            emit_on_subscribe,
            emit_on_invalidate: AtomicBool::new(true),
            fail_persistence: AtomicBool::new(false),
        }
    }

    pub fn emit(&self, identity: Option<Identity>) {
        let mut state = self.state.lock().unwrap();
        state.current.clone_from(&identity);
        for (_, listener) in &state.listeners {
            listener(identity.clone());
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().unwrap().listeners.len()
    }

    pub fn set_emit_on_invalidate(&self, emit: bool) {
        self.emit_on_invalidate.store(emit, Ordering::SeqCst);
    }

    pub fn set_fail_persistence(&self, fail: bool) {
        self.fail_persistence.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl IdentitySource for ScriptedIdentity {
    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        if self.emit_on_subscribe {
            listener(state.current.clone());
        }
        state.listeners.push((id, listener));

        let shared = Arc::clone(&self.state);
        Subscription::new(move || {
            shared.lock().unwrap().listeners.retain(|(l, _)| *l != id);
        })
    }

    async fn create_credential(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        self.record(format!("create_credential:{email}"));
        let identity = Identity::new("uid-new").with_email(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn authenticate(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        self.record(format!("authenticate:{email}"));
        let identity = Identity::new("uid-known").with_email(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn authenticate_federated(&self) -> Result<Identity, AuthError> {
        self.record("authenticate_federated".into());
        Err(FederatedAuthError::PopupClosed.into())
    }

    async fn invalidate(&self) -> Result<(), AuthError> {
        self.record("invalidate".into());
        if self.emit_on_invalidate.load(Ordering::SeqCst) {
            self.emit(None);
        }
        Ok(())
    }

    async fn set_session_persistence(&self, mode: PersistenceMode) -> Result<(), AuthError> {
        self.record(format!("persistence:{mode}"));
        if self.fail_persistence.load(Ordering::SeqCst) {
            return Err(AuthError::Other("persistence unsupported".into()));
        }
        Ok(())
    }

    async fn update_display_name(&self, name: &str) -> Result<(), AuthError> {
        self.record(format!("update_display_name:{name}"));
        let updated = self
            .state
            .lock()
            .unwrap()
            .current
            .clone()
            .ok_or(AuthError::NotSignedIn)?
            .with_display_name(name);
        self.emit(Some(updated));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub type LoadResult = Result<Option<Profile>, StoreError>;

pub struct GatedStore {
    pub inner: MemoryProfileStore,
    gates: Mutex<HashMap<String, VecDeque<oneshot::Receiver<LoadResult>>>>,
    finished_tx: mpsc::UnboundedSender<String>,
    finished_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
}

impl GatedStore {
    pub fn new() -> Arc<Self> {
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            inner: MemoryProfileStore::with_clock(stepping_clock()),
            gates: Mutex::new(HashMap::new()),
            finished_tx,
            finished_rx: tokio::sync::Mutex::new(finished_rx),
        })
    }

    /// Hold the next read of `id` until the returned sender supplies a result.
    pub fn hold(&self, id: &str) -> oneshot::Sender<LoadResult> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    /// Id of the next read to return, in completion order.
    pub async fn next_finished(&self) -> String {
        self.finished_rx
            .lock()
            .await
            .recv()
            .await
            .expect("store dropped")
    }

    pub async fn seed(&self, id: &str, display_name: &str) {
        self.inner
            .create_or_merge(id, &ProfilePatchBuilder::new().display_name(display_name).build())
            .await
            .expect("seed profile");
    }
}

#[async_trait]
impl ProfileStore for GatedStore {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let gate = self
            .gates
            .lock()
            .unwrap()
            .get_mut(id)
            .and_then(VecDeque::pop_front);
        let result = match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(StoreError::Unavailable("gate dropped".into()))),
            None => self.inner.get(id).await,
        };
        let _ = self.finished_tx.send(id.to_string());
        result
    }

    async fn create_or_merge(&self, id: &str, patch: &ProfilePatch) -> Result<(), StoreError> {
        self.inner.create_or_merge(id, patch).await
    }
}

/// Answers every read after a per-id delay, so fetches started in order
/// finish out of order on a multi-threaded runtime.
pub struct DelayedStore {
    pub inner: MemoryProfileStore,
    delay: fn(&str) -> Duration,
}

impl DelayedStore {
    pub fn new(delay: fn(&str) -> Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryProfileStore::with_clock(stepping_clock()),
            delay,
        })
    }
}

#[async_trait]
impl ProfileStore for DelayedStore {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        tokio::time::sleep((self.delay)(id)).await;
        self.inner.get(id).await
    }

    async fn create_or_merge(&self, id: &str, patch: &ProfilePatch) -> Result<(), StoreError> {
        self.inner.create_or_merge(id, patch).await
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// Clock that advances one second per reading.
pub fn stepping_clock() -> Clock {
    let tick = Arc::new(AtomicI64::new(0));
    Arc::new(move || base_time() + chrono::Duration::seconds(tick.fetch_add(1, Ordering::SeqCst)))
}

pub fn profile(display_name: &str) -> Profile {
    Profile::create(
        &ProfilePatchBuilder::new().display_name(display_name).build(),
        base_time(),
    )
    .unwrap()
}

pub fn identity(id: &str) -> Identity {
    Identity::new(id).with_email(format!("{id}@example.com"))
}
