//! # parley-core
//!
//! Core types, ID generation, and error types for Parley.
//!
//! This crate provides the foundational types shared across all Parley crates:
//! - `Identity` snapshots emitted by identity providers
//! - `Profile` documents and the `ProfilePatch` merge semantics
//! - `SessionState`, the unified view exposed by the session controller
//! - Display defaults derived from identity when the profile lags
//! - ID prefix constants and formatting helpers
//! - Cross-cutting error types

pub mod display;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod profile;
pub mod session;

pub use display::DisplayProfile;
pub use enums::{PersistenceMode, Phase};
pub use errors::CoreError;
pub use identity::Identity;
pub use profile::{Profile, ProfilePatch, ProfilePatchBuilder};
pub use session::SessionState;
