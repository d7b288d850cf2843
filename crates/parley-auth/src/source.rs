//! The identity provider port.
//!
//! Controllers receive an explicitly constructed `Arc<dyn IdentitySource>`;
//! nothing here reaches for a process-wide client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parley_core::{Identity, PersistenceMode};

use crate::error::AuthError;

/// Callback invoked with every sign-in state change, in provider order.
///
/// Listeners run synchronously inside the provider's notification and must not
/// call back into the provider.
pub type IdentityListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// External identity provider.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Register a listener. Providers report their current state to a new
    /// listener (possibly "no identity" before the real state is known).
    fn subscribe(&self, listener: IdentityListener) -> Subscription;

    async fn create_credential(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn authenticate_federated(&self) -> Result<Identity, AuthError>;

    async fn invalidate(&self) -> Result<(), AuthError>;

    async fn set_session_persistence(&self, mode: PersistenceMode) -> Result<(), AuthError>;

    /// Set the display name on the currently signed-in identity.
    async fn update_display_name(&self, name: &str) -> Result<(), AuthError>;
}

/// Cancellable registration returned by [`IdentitySource::subscribe`].
///
/// Disposes on [`Subscription::unsubscribe`] or on drop, whichever comes first.
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.dispose_now();
    }

    fn dispose_now(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn unsubscribe_disposes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        subscription.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_disposes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        {
            let _subscription = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
