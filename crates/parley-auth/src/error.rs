use thiserror::Error;

/// User-actionable credential failures. Messages are shown inline as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("an account already exists for {0}")]
    EmailAlreadyInUse(String),

    #[error("password is too weak, use at least {min} characters")]
    WeakPassword { min: usize },

    #[error("no account found for {0}")]
    UserNotFound(String),

    #[error("wrong password")]
    WrongPassword,
}

/// Federated (popup/redirect) sign-in failures. Never fatal to the app.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FederatedAuthError {
    #[error("sign-in window was closed before completing")]
    PopupClosed,

    #[error("network error during federated sign-in: {0}")]
    Network(String),

    #[error("federated provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Federated(#[from] FederatedAuthError),

    #[error("not signed in")]
    NotSignedIn,

    #[error("identity storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}
