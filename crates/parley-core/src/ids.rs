//! ID prefixes and generation.
//!
//! IDs are `{prefix}-{16 hex chars}` drawn from the OS random source.

use crate::errors::CoreError;

pub const PREFIX_IDENTITY: &str = "uid";

/// Generate a new ID with the given prefix.
///
/// # Errors
///
/// Returns `CoreError::Random` if the OS random source fails.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes).map_err(|e| CoreError::Random(e.to_string()))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}
