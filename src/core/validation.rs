//! Validation schemas for the sign-in and sign-up forms
//!
//! Malformed input is an expected outcome: validators return either the typed
//! credentials ready to send, or a per-field error set. They never panic.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::auth::models::{LoginCredentials, RegisterCredentials, Role};

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum name length
pub const MIN_NAME_LENGTH: usize = 2;

/// Message shown when no field-specific message exists
pub const GENERIC_MESSAGE: &str = "Please check the information provided and try again.";

/// Form fields, declared in the order their errors are surfaced
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display,
)]
pub enum Field {
    #[display("name")]
    Name,
    #[display("email")]
    Email,
    #[display("password")]
    Password,
    #[display("confirmPassword")]
    ConfirmPassword,
    #[display("role")]
    Role,
    #[display("clinicId")]
    ClinicId,
}

/// Per-field validation messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first one recorded for a field wins
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Errors in priority order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// The single message to surface: the highest-priority field's message,
    /// or the generic one
    pub fn summary(&self) -> &str {
        self.errors
            .values()
            .next()
            .map(String::as_str)
            .unwrap_or(GENERIC_MESSAGE)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Raw sign-in form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignInInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

/// Raw sign-up form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignUpInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub role: Option<String>,
    pub clinic_id: Option<String>,
}

/// Validate sign-in input
pub fn validate_sign_in(input: &SignInInput) -> Result<LoginCredentials, FieldErrors> {
    let mut errors = FieldErrors::new();

    match input.email.as_deref() {
        None | Some("") => errors.add(Field::Email, "Enter your email"),
        Some(email) if !is_valid_email(email) => errors.add(Field::Email, "Invalid email"),
        Some(_) => {}
    }

    match input.password.as_deref() {
        None => errors.add(Field::Password, "Enter your password"),
        Some(password) if char_len(password) < MIN_PASSWORD_LENGTH => errors.add(
            Field::Password,
            "Password must be at least 6 characters",
        ),
        Some(_) => {}
    }

    errors.into_result(|| LoginCredentials {
        email: input.email.clone().unwrap_or_default(),
        password: input.password.clone().unwrap_or_default(),
    })
}

/// Validate sign-up input
///
/// A password mismatch is reported on `confirmPassword`, never on `password`.
pub fn validate_sign_up(input: &SignUpInput) -> Result<RegisterCredentials, FieldErrors> {
    let mut errors = FieldErrors::new();

    match input.name.as_deref() {
        Some(name) if char_len(name) >= MIN_NAME_LENGTH => {}
        _ => errors.add(Field::Name, "Enter your name"),
    }

    match input.email.as_deref() {
        None | Some("") => errors.add(Field::Email, "Enter your email"),
        Some(email) if !is_valid_email(email) => errors.add(Field::Email, "Invalid email"),
        Some(_) => {}
    }

    match input.password.as_deref() {
        None => errors.add(Field::Password, "Enter your password"),
        Some(password) if char_len(password) < MIN_PASSWORD_LENGTH => {
            errors.add(Field::Password, "Minimum of 6 characters")
        }
        Some(_) => {}
    }

    match input.confirm_password.as_deref() {
        Some(confirm) if char_len(confirm) >= MIN_PASSWORD_LENGTH => {
            if input.password.as_deref() != Some(confirm) {
                errors.add(Field::ConfirmPassword, "Passwords do not match");
            }
        }
        _ => errors.add(Field::ConfirmPassword, "Confirm your password"),
    }

    let role = input.role.as_deref().and_then(Role::parse);
    if role.is_none() {
        errors.add(Field::Role, "Select a valid role");
    }

    match input.clinic_id.as_deref() {
        Some(id) if !id.is_empty() => {}
        _ => errors.add(Field::ClinicId, "Select a clinic"),
    }

    let Some(role) = role else {
        return Err(errors);
    };

    errors.into_result(|| RegisterCredentials {
        name: input.name.clone().unwrap_or_default(),
        email: input.email.clone().unwrap_or_default(),
        password: input.password.clone().unwrap_or_default(),
        role,
        clinic_id: input.clinic_id.clone().unwrap_or_default(),
    })
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Standard email syntax: `local@label.label...tld`
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('.')
        && local
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '\'' | '+' | '-'))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let label_ok = |label: &&str| {
        !label.is_empty()
            && !label.starts_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };

    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels.iter().all(label_ok) && tld_ok
}
