//! # parley-session
//!
//! The session/identity synchronization layer.
//!
//! [`SessionController`] subscribes to an [`IdentitySource`](parley_auth::IdentitySource),
//! reconciles each emitted identity with its profile document in a
//! [`ProfileStore`](parley_store::ProfileStore), and publishes one
//! [`SessionState`](parley_core::SessionState) through a `watch` channel.
//! [`RouteGate`] turns that state into navigation decisions and
//! [`ProfileEditor`] writes profile changes back through the controller.

pub mod controller;
pub mod editor;
pub mod error;
pub mod gate;
pub mod routes;
pub mod signup;

pub use controller::{SessionController, SessionOptions};
pub use editor::{ProfileDraft, ProfileEditor};
pub use error::{ProfileEditError, SessionError, SignUpFormError};
pub use gate::{GateWatcher, RouteDecision, RouteGate};
pub use routes::Route;
pub use signup::{SignUpForm, ValidSignUp};
