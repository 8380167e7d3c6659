//! `/clientes/*` endpoints: registration, login and profile.

use reqwest::Method;
use tracing::instrument;

use santafe_core::CustomerId;

use crate::models::Cliente;

use super::types::{
    LoginRequest, RecordEnvelope, RegisterRequest, UpdateProfileRequest, ValidateEmailRequest,
    ValidateEnvelope,
};
use super::{ApiClient, ApiError, ApiResponse};

impl ApiClient {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse<Cliente>, ApiError> {
        let response = self
            .call::<RecordEnvelope<Cliente>, _>(Method::POST, "/clientes/register", Some(request))
            .await?;
        Ok(response.required())
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<ApiResponse<Cliente>, ApiError> {
        let response = self
            .call::<RecordEnvelope<Cliente>, _>(Method::POST, "/clientes/login", Some(request))
            .await?;
        Ok(response.required())
    }

    /// Fetch a customer record.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self, id), fields(customer_id = %id))]
    pub async fn get_profile(&self, id: &CustomerId) -> Result<ApiResponse<Cliente>, ApiError> {
        let path = format!("/clientes/profile?id={}", urlencoding::encode(id.as_str()));
        let response = self
            .call::<RecordEnvelope<Cliente>, ()>(Method::GET, &path, None)
            .await?;
        Ok(response.required())
    }

    /// Update basic profile fields and/or the password.
    ///
    /// The backend may omit the updated record, hence the `Option`.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self, request), fields(customer_id = %request.id))]
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<ApiResponse<Option<Cliente>>, ApiError> {
        self.call::<RecordEnvelope<Cliente>, _>(Method::PUT, "/clientes/profile", Some(request))
            .await
    }

    /// Ask whether an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could be reached or the body is malformed.
    #[instrument(skip(self))]
    pub async fn validate_email(&self, email: &str) -> Result<ApiResponse<bool>, ApiError> {
        let request = ValidateEmailRequest {
            email: email.to_string(),
        };
        self.call::<ValidateEnvelope, _>(Method::POST, "/clientes/validate", Some(&request))
            .await
    }
}
