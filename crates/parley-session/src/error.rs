use parley_auth::AuthError;
use parley_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("session controller has been shut down")]
    ShutDown,

    #[error("session controller must start inside a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Validation and save failures surfaced by the profile editor.
#[derive(Debug, Error)]
pub enum ProfileEditError {
    #[error("display name is required")]
    DisplayNameRequired,

    #[error("avatar URL is required")]
    AvatarRequired,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Sign-up form problems caught before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignUpFormError {
    #[error("email is required")]
    EmailRequired,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("display name is required")]
    DisplayNameRequired,
}
