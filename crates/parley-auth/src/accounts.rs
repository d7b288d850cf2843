//! Account registry for the local identity provider.
//!
//! Accounts are looked up by case-insensitive email. The registry is plain
//! data; persistence to `accounts.json` is handled by the provider.

use parley_core::Identity;
use parley_core::ids::{PREFIX_IDENTITY, generate_id};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, CredentialError};
use crate::password::MIN_PASSWORD_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string. `None` for accounts created by federated sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Account {
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&Account> {
        let wanted = normalize_email(email);
        self.accounts.iter().find(|a| normalize_email(&a.email) == wanted)
    }

    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    /// Insert a new account with a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::EmailAlreadyInUse` for a duplicate email, or
    /// `AuthError::Other` if no ID can be generated.
    pub fn insert(
        &mut self,
        email: &str,
        password_hash: Option<String>,
        display_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<&Account, AuthError> {
        if self.find_by_email(email).is_some() {
            return Err(CredentialError::EmailAlreadyInUse(email.trim().to_string()).into());
        }
        let id = generate_id(PREFIX_IDENTITY).map_err(|e| AuthError::Other(e.to_string()))?;
        self.accounts.push(Account {
            id,
            email: email.trim().to_string(),
            password_hash,
            display_name,
            avatar_url,
        });
        let index = self.accounts.len() - 1;
        Ok(&self.accounts[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Accept `local@domain.tld` shaped addresses without whitespace.
///
/// # Errors
///
/// Returns `CredentialError::InvalidEmail` otherwise.
pub fn validate_email(email: &str) -> Result<(), CredentialError> {
    let trimmed = email.trim();
    let invalid = || CredentialError::InvalidEmail(trimmed.to_string());

    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// # Errors
///
/// Returns `CredentialError::WeakPassword` for passwords shorter than
/// [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}
