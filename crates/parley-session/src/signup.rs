//! Sign-up form validation.

use crate::error::SignUpFormError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub display_name: String,
}

/// A form that passed [`SignUpForm::validate`], ready for
/// `SessionController::sign_up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignUp {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl SignUpForm {
    /// Check the fields a provider cannot: presence and matching passwords.
    /// Email format, duplicates, and password strength are left to the
    /// provider.
    ///
    /// # Errors
    ///
    /// The first failing rule, checked in field order.
    pub fn validate(&self) -> Result<ValidSignUp, SignUpFormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(SignUpFormError::EmailRequired);
        }
        if self.password != self.confirm_password {
            return Err(SignUpFormError::PasswordMismatch);
        }
        let display_name = self.display_name.trim();
        if display_name.is_empty() {
            return Err(SignUpFormError::DisplayNameRequired);
        }
        Ok(ValidSignUp {
            email: email.to_string(),
            password: self.password.clone(),
            display_name: display_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn form(email: &str, password: &str, confirm: &str, name: &str) -> SignUpForm {
        SignUpForm {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
            display_name: name.into(),
        }
    }

    #[test]
    fn trims_email_and_name() {
        let valid = form(" ann@example.com ", "secret1", "secret1", "  Ann Lee ")
            .validate()
            .expect("valid");
        assert_eq!(
            valid,
            ValidSignUp {
                email: "ann@example.com".into(),
                password: "secret1".into(),
                display_name: "Ann Lee".into(),
            }
        );
    }

    #[rstest]
    #[case(form("  ", "a", "a", "Ann"), SignUpFormError::EmailRequired)]
    #[case(form("a@b.io", "secret1", "secret2", "Ann"), SignUpFormError::PasswordMismatch)]
    #[case(form("a@b.io", "secret1", "secret1", " \t"), SignUpFormError::DisplayNameRequired)]
    #[case(form("", "x", "y", ""), SignUpFormError::EmailRequired)]
    fn rejects(#[case] form: SignUpForm, #[case] expected: SignUpFormError) {
        assert_eq!(form.validate().unwrap_err(), expected);
    }

    #[test]
    fn password_is_not_trimmed() {
        let err = form("a@b.io", "secret1 ", "secret1", "Ann")
            .validate()
            .unwrap_err();
        assert_eq!(err, SignUpFormError::PasswordMismatch);
    }
}
