//! Client-side credential validation.
//!
//! Validation runs before any network call; failures are field-scoped and
//! block submission entirely. This is a usability layer — the identity
//! service re-validates everything server-side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::AuthMode;

/// Minimum password length accepted by the form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum display-name length accepted by the registration form.
pub const MIN_NAME_LEN: usize = 2;

/// A credential form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Display name (register only).
    Name,
    /// Email address.
    Email,
    /// Password.
    Password,
    /// Password confirmation (register only).
    ConfirmPassword,
}

impl Field {
    /// Field name as used by form markup.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

/// Field-scoped validation errors.
///
/// At most one message per field; the first failing rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// `true` when no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The error message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }
}

/// Raw credential form input.
///
/// `name` and `confirm_password` are ignored in login mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialForm {
    /// Display name (register only).
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation (register only).
    pub confirm_password: String,
}

/// Validate `form` for submission in `mode`.
///
/// Returns the field-scoped errors; an empty result means the form may be
/// submitted.
#[must_use]
pub fn validate(form: &CredentialForm, mode: AuthMode) -> FieldErrors {
    let mut errors = FieldErrors::default();

    let email = form.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "email is required");
    } else if !looks_like_email(email) {
        errors.insert(Field::Email, "enter a valid email address");
    }

    if form.password.is_empty() {
        errors.insert(Field::Password, "password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            Field::Password,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }

    if mode == AuthMode::Register {
        let name = form.name.trim();
        if name.is_empty() {
            errors.insert(Field::Name, "name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.insert(
                Field::Name,
                format!("name must be at least {MIN_NAME_LEN} characters"),
            );
        }

        if form.confirm_password.is_empty() {
            errors.insert(Field::ConfirmPassword, "please confirm your password");
        } else if form.confirm_password != form.password {
            errors.insert(Field::ConfirmPassword, "passwords do not match");
        }
    }

    errors
}

/// Simple `local@domain` shape check. Deliberately loose — the identity
/// service owns real address validation.
fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
}
