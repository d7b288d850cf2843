use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parley_auth::LocalIdentityProvider;
use parley_config::ParleyConfig;
use parley_session::{RouteGate, SessionController, SessionOptions};
use parley_store::JsonFileProfileStore;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CredentialArgs;

const IDENTITY_DIR_NAME: &str = "identity";

/// Everything a command handler needs: a started, ready controller over the
/// local provider and file store, plus the configured route gate.
pub struct AppContext {
    pub controller: SessionController,
    pub gate: RouteGate,
}

impl AppContext {
    pub async fn init(flags: &GlobalFlags, config: ParleyConfig) -> anyhow::Result<Self> {
        let data_dir = match &flags.data_dir {
            Some(dir) => PathBuf::from(dir),
            None => config
                .store
                .resolve_data_dir()
                .context("cannot determine a data directory; pass --data-dir")?,
        };
        Self::open(&data_dir, config).await
    }

    pub async fn open(data_dir: &Path, config: ParleyConfig) -> anyhow::Result<Self> {
        let identity_dir = data_dir.join(IDENTITY_DIR_NAME);
        let provider = tokio::task::spawn_blocking(move || LocalIdentityProvider::open(identity_dir))
            .await
            .context("identity store task failed")?
            .with_context(|| format!("failed to open identity store in {}", data_dir.display()))?;
        let store = JsonFileProfileStore::new(data_dir, &config.store.collection);

        let controller = SessionController::start(
            Arc::new(provider),
            Arc::new(store),
            SessionOptions::from(&config.auth),
        )?;
        controller.ready().await?;
        tracing::debug!(data_dir = %data_dir.display(), "session ready");

        Ok(Self {
            gate: RouteGate::from_config(&config.routes),
            controller,
        })
    }

    /// Make sure someone is signed in, using `credentials` when the provider
    /// restored no session. Loads the profile before returning.
    pub async fn require_identity(&self, credentials: &CredentialArgs) -> anyhow::Result<()> {
        if !self.controller.state().is_signed_in() {
            match (&credentials.email, &credentials.password) {
                (Some(email), Some(password)) => {
                    self.controller
                        .sign_in(email, password)
                        .await
                        .context("sign in failed")?;
                }
                _ => anyhow::bail!("not signed in; pass --email and --password"),
            }
        }
        self.controller
            .refresh_profile()
            .await
            .context("failed to load profile")?;
        Ok(())
    }

    /// Sign in when credentials were given; otherwise keep whatever session
    /// the provider restored.
    pub async fn sign_in_if_requested(&self, credentials: &CredentialArgs) -> anyhow::Result<()> {
        if credentials.email.is_some() {
            self.require_identity(credentials).await?;
        } else if self.controller.state().is_signed_in() {
            self.controller
                .refresh_profile()
                .await
                .context("failed to load profile")?;
        }
        Ok(())
    }

    pub fn finish(self) {
        self.controller.shutdown();
    }
}
