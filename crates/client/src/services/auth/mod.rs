//! Authentication service.
//!
//! Composes the validators, the backend client, the session store and the
//! cart into the login, signup, logout and profile flows.

mod error;

pub use error::{AuthError, NOT_LOGGED_IN_MESSAGE, STORAGE_MESSAGE};

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use santafe_core::{Cart, Email};

use crate::api::{
    ApiClient, ApiResponse, DEFAULT_REJECTION, LoginRequest, RegisterRequest,
    UpdateProfileRequest, UpdateUserRequest,
};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{Cliente, UserProfile};
use crate::storage::SessionStore;
use crate::validators::auth::{PASSWORD_REQUIRED, PASSWORD_TOO_SHORT};
use crate::validators::{LoginForm, ProfileForm, SignupForm, ValidProfile};

/// Fallback when the backend rejects a login without a message.
pub const LOGIN_REJECTED: &str = "Credenciais inválidas";
/// Fallback when the backend rejects a signup without a message.
pub const SIGNUP_REJECTED: &str = "Erro no cadastro";

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

fn rejected(message: Option<String>, fallback: &str) -> AuthError {
    AuthError::Rejected {
        message: message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    }
}

/// Authentication service.
///
/// Borrowed view over the application state; build one per operation with
/// [`AppState::auth`](crate::state::AppState::auth).
pub struct AuthService<'a> {
    api: &'a ApiClient,
    session: &'a SessionStore,
    cart: &'a Mutex<Cart>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a SessionStore, cart: &'a Mutex<Cart>) -> Self {
        Self { api, session, cart }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in with email and password and start a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidLogin` if the form is invalid (no request is
    /// sent), `AuthError::Rejected` if the backend refuses the credentials.
    #[instrument(skip(self, form))]
    pub async fn login(&self, form: &LoginForm) -> Result<UserProfile, AuthError> {
        let valid = form.validate().map_err(AuthError::InvalidLogin)?;

        let request = LoginRequest {
            email: valid.email.into_inner(),
            senha: valid.password,
        };

        match self.api.login(&request).await? {
            ApiResponse::Success { data, .. } => self.start_session(data).await,
            ApiResponse::Failure { message } => Err(rejected(message, LOGIN_REJECTED)),
        }
    }

    /// Create an account and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSignup` if the form is invalid (no request
    /// is sent), `AuthError::Rejected` if the backend refuses the signup.
    #[instrument(skip(self, form))]
    pub async fn signup(&self, form: &SignupForm) -> Result<UserProfile, AuthError> {
        let valid = form.validate().map_err(AuthError::InvalidSignup)?;

        let request = RegisterRequest {
            nome: valid.nome,
            email: valid.email.into_inner(),
            senha: valid.senha,
            telefone: valid.telefone,
            endereco: None,
        };

        match self.api.register(&request).await? {
            ApiResponse::Success { data, .. } => self.start_session(data).await,
            ApiResponse::Failure { message } => Err(rejected(message, SIGNUP_REJECTED)),
        }
    }

    async fn start_session(&self, cliente: Cliente) -> Result<UserProfile, AuthError> {
        let profile = UserProfile::from_cliente(cliente, Utc::now());
        self.session.save_profile(&profile).await?;

        set_sentry_user(&profile.id, Some(&profile.email));
        info!(customer_id = %profile.id, "Session started");
        Ok(profile)
    }

    /// End the session: forget the stored profile and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored profile cannot be removed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.remove_profile().await?;
        self.cart.lock().await.clear();

        clear_sentry_user();
        info!("Session ended");
        Ok(())
    }

    /// The logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        Ok(self.session.profile().await?)
    }

    async fn require_user(&self) -> Result<UserProfile, AuthError> {
        self.current_user().await?.ok_or(AuthError::NotLoggedIn)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Re-read the basic customer record and fold it into the session.
    ///
    /// Document and address fields are kept as stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session.
    #[instrument(skip(self))]
    pub async fn refresh_profile(&self) -> Result<UserProfile, AuthError> {
        let mut profile = self.require_user().await?;

        match self.api.get_profile(&profile.id).await? {
            ApiResponse::Success { data, .. } => {
                profile.merge_cliente(data, Utc::now());
                self.session.save_profile(&profile).await?;
                Ok(profile)
            }
            ApiResponse::Failure { message } => Err(rejected(message, DEFAULT_REJECTION)),
        }
    }

    /// Load the full profile from `/user/{id}` and replace the session copy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session.
    #[instrument(skip(self))]
    pub async fn load_profile(&self) -> Result<UserProfile, AuthError> {
        let current = self.require_user().await?;

        match self.api.get_user(&current.id).await? {
            ApiResponse::Success { data, .. } => {
                self.session.save_profile(&data).await?;
                Ok(data)
            }
            ApiResponse::Failure { message } => Err(rejected(message, DEFAULT_REJECTION)),
        }
    }

    /// Validate and save profile edits.
    ///
    /// When the backend does not echo the record back, the stored profile is
    /// updated from the submitted values.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidProfile` if the form is invalid (no request
    /// is sent).
    #[instrument(skip(self, form))]
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<UserProfile, AuthError> {
        let current = self.require_user().await?;
        let valid = form.validate().map_err(AuthError::InvalidProfile)?;

        let request = UpdateUserRequest {
            id: current.id.clone(),
            nome: valid.nome.clone(),
            email: valid.email.as_str().to_string(),
            telefone: valid.telefone.clone(),
            cpf: valid.cpf.clone(),
            endereco: valid.endereco.clone(),
            cidade: valid.cidade.clone(),
            estado: valid.estado.clone(),
            cep: valid.cep.clone(),
        };

        let profile = match self.api.update_user(&request).await? {
            ApiResponse::Success {
                data: Some(profile),
                ..
            } => profile,
            ApiResponse::Success { data: None, .. } => apply_profile(current, valid),
            ApiResponse::Failure { message } => {
                return Err(rejected(message, DEFAULT_REJECTION));
            }
        };

        self.session.save_profile(&profile).await?;
        info!(customer_id = %profile.id, "Profile updated");
        Ok(profile)
    }

    /// Change the password of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the current password is empty or
    /// the new one is shorter than six characters.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        current_password: SecretString,
        new_password: SecretString,
    ) -> Result<(), AuthError> {
        let mut profile = self.require_user().await?;

        if current_password.expose_secret().is_empty() {
            return Err(AuthError::WeakPassword(PASSWORD_REQUIRED.to_string()));
        }
        if new_password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(PASSWORD_TOO_SHORT.to_string()));
        }

        let request = UpdateProfileRequest {
            id: profile.id.clone(),
            senha_atual: Some(current_password),
            nova_senha: Some(new_password),
            ..Default::default()
        };

        match self.api.update_profile(&request).await? {
            ApiResponse::Success { data, .. } => {
                if let Some(cliente) = data {
                    profile.merge_cliente(cliente, Utc::now());
                    self.session.save_profile(&profile).await?;
                }
                info!(customer_id = %profile.id, "Password changed");
                Ok(())
            }
            ApiResponse::Failure { message } => Err(rejected(message, DEFAULT_REJECTION)),
        }
    }

    /// Whether `email` already belongs to an account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed address (no request
    /// is sent).
    #[instrument(skip(self))]
    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let email = Email::parse(email)?;
        match self.api.validate_email(email.as_str()).await? {
            ApiResponse::Success { data, .. } => Ok(data),
            ApiResponse::Failure { message } => Err(rejected(message, DEFAULT_REJECTION)),
        }
    }
}

fn apply_profile(mut profile: UserProfile, valid: ValidProfile) -> UserProfile {
    profile.nome = valid.nome;
    profile.email = valid.email.into_inner();
    profile.telefone = valid.telefone;
    profile.cpf = valid.cpf;
    profile.endereco = valid.endereco;
    profile.cidade = valid.cidade;
    profile.estado = valid.estado;
    profile.cep = valid.cep;
    profile.updated_at = Utc::now();
    profile
}
