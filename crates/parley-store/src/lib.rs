//! # parley-store
//!
//! Profile document storage for Parley.
//!
//! [`ProfileStore`] is the port the session controller writes through;
//! [`MemoryProfileStore`] and [`JsonFileProfileStore`] implement it with the
//! same create-or-merge semantics and server-assigned timestamps.

pub mod error;
pub mod json_file;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use json_file::JsonFileProfileStore;
pub use memory::{Access, MemoryProfileStore};
pub use store::{Clock, ProfileStore, system_clock};
