//! In-process identity provider.
//!
//! Holds accounts in memory, optionally backed by a directory:
//!
//! ```text
//! <dir>/accounts.json   registered accounts (argon2 password hashes)
//! <dir>/session.json    signed-in identity, only under `local` persistence
//! ```
//!
//! Opening a directory again behaves like a browser restart: a session
//! survives only if it was persisted under [`PersistenceMode::Local`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use parley_core::{Identity, PersistenceMode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::accounts::{AccountRegistry, validate_email, validate_password};
use crate::error::{AuthError, CredentialError, FederatedAuthError};
use crate::password;
use crate::source::{IdentityListener, IdentitySource, Subscription};

const ACCOUNTS_FILE_NAME: &str = "accounts.json";
const SESSION_FILE_NAME: &str = "session.json";

/// Result the next federated sign-in attempt will produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FederatedOutcome {
    /// The user approved; sign in (creating the account on first use).
    Approve {
        email: String,
        display_name: Option<String>,
        avatar_url: Option<String>,
    },
    /// The user closed the sign-in window.
    Cancel,
    /// The exchange failed in transit.
    NetworkFailure(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    identity_id: String,
}

struct ProviderState {
    accounts: AccountRegistry,
    current: Option<Identity>,
    persistence: PersistenceMode,
    listeners: Vec<(u64, IdentityListener)>,
    next_listener_id: u64,
    staged_federated: Option<FederatedOutcome>,
    dir: Option<PathBuf>,
}

/// Local identity provider implementing [`IdentitySource`].
///
/// Listeners are notified while the provider's lock is held, so emissions
/// reach every listener in the order they happened.
#[derive(Clone)]
pub struct LocalIdentityProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl LocalIdentityProvider {
    /// Provider with no backing directory; everything is lost on drop.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_state(ProviderState {
            accounts: AccountRegistry::default(),
            current: None,
            persistence: PersistenceMode::Local,
            listeners: Vec::new(),
            next_listener_id: 0,
            staged_federated: None,
            dir: None,
        })
    }

    /// Open (or create) a directory-backed provider and restore a persisted
    /// session if one exists.
    ///
    /// Reads and writes the directory with blocking `std::fs` calls. Async
    /// callers run it through `tokio::task::spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the directory or its files cannot be
    /// read or parsed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let dir = dir.into();
        create_private_dir(&dir)?;

        let accounts: AccountRegistry =
            read_json(&dir.join(ACCOUNTS_FILE_NAME))?.unwrap_or_default();
        let session: Option<SessionFile> = read_json(&dir.join(SESSION_FILE_NAME))?;
        let current = session.and_then(|s| match accounts.find_by_id(&s.identity_id) {
            Some(account) => Some(account.identity()),
            None => {
                tracing::warn!(
                    identity_id = %s.identity_id,
                    "persisted session refers to an unknown account; starting signed out"
                );
                None
            }
        });

        tracing::debug!(
            dir = %dir.display(),
            accounts = accounts.len(),
            restored = current.is_some(),
            "opened local identity provider"
        );

        Ok(Self::from_state(ProviderState {
            accounts,
            current,
            persistence: PersistenceMode::Local,
            listeners: Vec::new(),
            next_listener_id: 0,
            staged_federated: None,
            dir: Some(dir),
        }))
    }

    fn from_state(state: ProviderState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide what the next federated sign-in attempt returns.
    pub fn stage_federated(&self, outcome: FederatedOutcome) {
        self.lock().staged_federated = Some(outcome);
    }

    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    #[must_use]
    pub fn persistence(&self) -> PersistenceMode {
        self.lock().persistence
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Make `identity` the signed-in user and notify listeners.
    fn sign_in_as(&self, identity: &Identity) -> Result<(), AuthError> {
        let mut state = self.lock();
        state.write_session(Some(&identity.id))?;
        state.current = Some(identity.clone());
        state.notify();
        Ok(())
    }
}

impl ProviderState {
    fn notify(&self) {
        tracing::debug!(
            identity_id = self.current.as_ref().map(|i| i.id.as_str()),
            listeners = self.listeners.len(),
            "identity changed"
        );
        for (_, listener) in &self.listeners {
            listener(self.current.clone());
        }
    }

    fn save_accounts(&self, accounts: &AccountRegistry) -> Result<(), AuthError> {
        match &self.dir {
            Some(dir) => write_private_json(&dir.join(ACCOUNTS_FILE_NAME), accounts),
            None => Ok(()),
        }
    }

    /// Persist (or clear) the session file according to the current mode.
    fn write_session(&self, identity_id: Option<&str>) -> Result<(), AuthError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = dir.join(SESSION_FILE_NAME);
        match identity_id {
            Some(id) if self.persistence.survives_restart() => write_private_json(
                &path,
                &SessionFile {
                    identity_id: id.to_string(),
                },
            ),
            _ => remove_if_exists(&path),
        }
    }
}

#[async_trait]
impl IdentitySource for LocalIdentityProvider {
    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let mut state = self.lock();
        let id = state.next_listener_id;
        state.next_listener_id += 1;
        listener(state.current.clone());
        state.listeners.push((id, listener));
        drop(state);

        let weak: Weak<Mutex<ProviderState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                state.listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    async fn create_credential(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        validate_email(email)?;
        validate_password(password)?;
        if self.lock().accounts.find_by_email(email).is_some() {
            return Err(CredentialError::EmailAlreadyInUse(email.trim().to_string()).into());
        }

        let password = password.to_string();
        let phc = tokio::task::spawn_blocking(move || password::hash(&password))
            .await
            .map_err(|e| AuthError::Other(format!("spawn_blocking join: {e}")))??;

        let identity = {
            let mut state = self.lock();
            let mut accounts = state.accounts.clone();
            let identity = accounts.insert(email, Some(phc), None, None)?.identity();
            state.save_accounts(&accounts)?;
            state.accounts = accounts;
            identity
        };

        tracing::info!(identity_id = %identity.id, "created credential");
        self.sign_in_as(&identity)?;
        Ok(identity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let (phc, identity) = {
            let state = self.lock();
            let account = state
                .accounts
                .find_by_email(email)
                .ok_or_else(|| CredentialError::UserNotFound(email.trim().to_string()))?;
            (account.password_hash.clone(), account.identity())
        };
        let Some(phc) = phc else {
            return Err(CredentialError::WrongPassword.into());
        };

        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || password::verify(&phc, &password))
            .await
            .map_err(|e| AuthError::Other(format!("spawn_blocking join: {e}")))?;
        if !matches {
            return Err(CredentialError::WrongPassword.into());
        }

        self.sign_in_as(&identity)?;
        Ok(identity)
    }

    async fn authenticate_federated(&self) -> Result<Identity, AuthError> {
        let outcome = self.lock().staged_federated.take();
        let (email, display_name, avatar_url) = match outcome {
            Some(FederatedOutcome::Approve {
                email,
                display_name,
                avatar_url,
            }) => (email, display_name, avatar_url),
            Some(FederatedOutcome::NetworkFailure(reason)) => {
                return Err(FederatedAuthError::Network(reason).into());
            }
            Some(FederatedOutcome::Cancel) | None => {
                return Err(FederatedAuthError::PopupClosed.into());
            }
        };
        validate_email(&email)?;

        let identity = {
            let mut state = self.lock();
            if let Some(account) = state.accounts.find_by_email(&email) {
                account.identity()
            } else {
                let mut accounts = state.accounts.clone();
                let identity = accounts
                    .insert(&email, None, display_name, avatar_url)?
                    .identity();
                state.save_accounts(&accounts)?;
                state.accounts = accounts;
                identity
            }
        };

        self.sign_in_as(&identity)?;
        Ok(identity)
    }

    async fn invalidate(&self) -> Result<(), AuthError> {
        let mut state = self.lock();
        state.write_session(None)?;
        if state.current.take().is_some() {
            state.notify();
        }
        Ok(())
    }

    async fn set_session_persistence(&self, mode: PersistenceMode) -> Result<(), AuthError> {
        let mut state = self.lock();
        state.persistence = mode;
        let current_id = state.current.as_ref().map(|identity| identity.id.clone());
        state.write_session(current_id.as_deref())
    }

    async fn update_display_name(&self, name: &str) -> Result<(), AuthError> {
        let mut state = self.lock();
        let current_id = state
            .current
            .as_ref()
            .map(|identity| identity.id.clone())
            .ok_or(AuthError::NotSignedIn)?;

        let mut accounts = state.accounts.clone();
        let account = accounts
            .find_by_id_mut(&current_id)
            .ok_or_else(|| AuthError::Other(format!("no account for identity {current_id}")))?;
        account.display_name = Some(name.to_string());
        let identity = account.identity();
        state.save_accounts(&accounts)?;
        state.accounts = accounts;
        state.current = Some(identity);
        state.notify();
        Ok(())
    }
}

// --- Private file helpers ---

fn create_private_dir(dir: &Path) -> Result<(), AuthError> {
    fs::create_dir_all(dir)
        .map_err(|e| AuthError::Storage(format!("mkdir {}: {e}", dir.display())))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(dir, fs::Permissions::from_mode(0o700)) {
            tracing::warn!("failed to chmod 0700 {}: {e}", dir.display());
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AuthError> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AuthError::Storage(format!("parse {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AuthError::Storage(format!("read {}: {e}", path.display()))),
    }
}

fn write_private_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AuthError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AuthError::Storage(format!("serialize {}: {e}", path.display())))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .map_err(|e| AuthError::Storage(format!("write {}: {e}", tmp.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::Storage(format!("chmod {}: {e}", tmp.display())))?;
    }

    fs::rename(&tmp, path)
        .map_err(|e| AuthError::Storage(format!("rename {}: {e}", path.display())))
}

fn remove_if_exists(path: &Path) -> Result<(), AuthError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AuthError::Storage(format!(
            "failed to delete {}: {e}",
            path.display()
        ))),
    }
}
