//! Sign-in and sign-up submission flows
//!
//! What a form does on submit, minus the rendering: validate, surface one
//! aggregated message on failure without touching the network, otherwise call
//! the auth service and turn its result into a message for the user.

use super::models::User;
use super::service::AuthService;
use super::storage::Storage;
use crate::core::validation::{
    FieldErrors, SignInInput, SignUpInput, validate_sign_in, validate_sign_up,
};

/// Successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub user: Option<User>,
    pub message: String,
}

/// Failed submission
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Input failed validation; nothing was sent
    #[error("{message}")]
    Invalid {
        errors: FieldErrors,
        message: String,
    },

    /// The server refused or could not be reached
    #[error("{message}")]
    Rejected { message: String },
}

impl SubmitError {
    fn invalid(errors: FieldErrors) -> Self {
        let message = errors.summary().to_string();
        SubmitError::Invalid { errors, message }
    }

    /// Per-field errors, for highlighting inputs
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid { errors, .. } => Some(errors),
            SubmitError::Rejected { .. } => None,
        }
    }
}

/// Validate and submit the sign-in form
pub async fn submit_sign_in<S: Storage + 'static>(
    auth: &AuthService<S>,
    input: &SignInInput,
) -> Result<SubmitOutcome, SubmitError> {
    let credentials = validate_sign_in(input).map_err(SubmitError::invalid)?;

    let response = auth
        .login(&credentials)
        .await
        .map_err(|e| SubmitError::Rejected {
            message: e.to_string(),
        })?;

    if !response.success {
        return Err(SubmitError::Rejected {
            message: non_empty_or(response.message, "Login failed. Please try again."),
        });
    }

    let user = response.data.map(|session| session.user);
    let fallback = match &user {
        Some(user) => format!("Welcome, {}!", user.name),
        None => "Welcome!".to_string(),
    };

    Ok(SubmitOutcome {
        message: non_empty_or(response.message, &fallback),
        user,
    })
}

/// Validate and submit the sign-up form
pub async fn submit_sign_up<S: Storage + 'static>(
    auth: &AuthService<S>,
    input: &SignUpInput,
) -> Result<SubmitOutcome, SubmitError> {
    let credentials = validate_sign_up(input).map_err(SubmitError::invalid)?;

    let response = auth
        .register(&credentials)
        .await
        .map_err(|e| SubmitError::Rejected {
            message: e.to_string(),
        })?;

    if !response.success {
        return Err(SubmitError::Rejected {
            message: non_empty_or(response.message, "Registration failed. Please try again."),
        });
    }

    Ok(SubmitOutcome {
        message: non_empty_or(response.message, "Account created successfully!"),
        user: response.data.map(|session| session.user),
    })
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
