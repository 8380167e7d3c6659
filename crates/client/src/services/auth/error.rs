//! Authentication error types.

use thiserror::Error;

use santafe_core::EmailError;

use crate::api::{ApiError, CONNECTIVITY_MESSAGE};
use crate::storage::StorageError;
use crate::validators::{FieldErrors, LoginField, ProfileField, SignupField};

/// Shown when an operation needs a session and there is none.
pub const NOT_LOGGED_IN_MESSAGE: &str = "Faça login para continuar";
/// Shown when the local session could not be read or written.
pub const STORAGE_MESSAGE: &str = "Erro ao salvar dados no dispositivo";

/// Errors that can occur during authentication and profile operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login form failed validation.
    #[error("invalid login form: {0}")]
    InvalidLogin(FieldErrors<LoginField>),

    /// Signup form failed validation.
    #[error("invalid signup form: {0}")]
    InvalidSignup(FieldErrors<SignupField>),

    /// Profile form failed validation.
    #[error("invalid profile form: {0}")]
    InvalidProfile(FieldErrors<ProfileField>),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password too weak or missing.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The backend refused the operation; the message is shown verbatim.
    #[error("{message}")]
    Rejected { message: String },

    /// No session is stored.
    #[error("not logged in")]
    NotLoggedIn,

    /// The backend could not be reached or answered garbage.
    #[error(transparent)]
    Api(ApiError),

    /// Session storage error.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message } => Self::Rejected { message },
            other => Self::Api(other),
        }
    }
}

fn first_message<F: Ord>(errors: &FieldErrors<F>) -> &str {
    errors.iter().next().map_or("", |(_, message)| message)
}

impl AuthError {
    /// Message suitable for showing to the end user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidLogin(errors) => first_message(errors),
            Self::InvalidSignup(errors) => first_message(errors),
            Self::InvalidProfile(errors) => first_message(errors),
            Self::InvalidEmail(_) => crate::validators::auth::INVALID_EMAIL,
            Self::WeakPassword(message) | Self::Rejected { message } => message,
            Self::NotLoggedIn => NOT_LOGGED_IN_MESSAGE,
            Self::Api(err) => err.user_message(),
            Self::Storage(_) => STORAGE_MESSAGE,
        }
    }

    /// Field errors for the login form.
    ///
    /// Backend and connectivity failures land on the password field.
    #[must_use]
    pub fn login_errors(&self) -> FieldErrors<LoginField> {
        match self {
            Self::InvalidLogin(errors) => errors.clone(),
            Self::InvalidEmail(_) => {
                FieldErrors::single(LoginField::Email, crate::validators::auth::INVALID_EMAIL)
            }
            Self::Api(_) => FieldErrors::single(LoginField::Password, CONNECTIVITY_MESSAGE),
            other => FieldErrors::single(LoginField::Password, other.user_message()),
        }
    }

    /// Field errors for the signup form.
    ///
    /// Backend and connectivity failures land on the email field.
    #[must_use]
    pub fn signup_errors(&self) -> FieldErrors<SignupField> {
        match self {
            Self::InvalidSignup(errors) => errors.clone(),
            Self::Api(_) => FieldErrors::single(SignupField::Email, CONNECTIVITY_MESSAGE),
            other => FieldErrors::single(SignupField::Email, other.user_message()),
        }
    }
}
