//! # parley-auth
//!
//! Identity provider boundary for Parley.
//!
//! Provides the [`IdentitySource`] port the session controller depends on, the
//! cancellable [`Subscription`] handle, the credential/federated error
//! taxonomy, and [`LocalIdentityProvider`], an in-process provider with
//! argon2-hashed accounts and optional on-disk persistence.

pub mod accounts;
pub mod error;
pub mod local;
pub mod password;
pub mod source;

pub use error::{AuthError, CredentialError, FederatedAuthError};
pub use local::{FederatedOutcome, LocalIdentityProvider};
pub use source::{IdentityListener, IdentitySource, Subscription};
