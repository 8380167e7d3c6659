//! Wire types for the storefront backend.
//!
//! Every backend response is a JSON object with a `success` flag, an
//! optional human-readable `message` and an endpoint-specific payload key.
//! The private envelope structs mirror those shapes exactly; callers only
//! ever see the tagged [`ApiResponse`].

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use santafe_core::CustomerId;

use crate::models::{Categoria, Produto};

use super::ApiError;

/// Message used when the backend rejects a call without saying why.
pub const DEFAULT_REJECTION: &str = "Não foi possível concluir a operação";

/// Outcome of a call that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse<T> {
    /// `success: true` with the expected payload.
    Success {
        data: T,
        message: Option<String>,
    },
    /// `success: false` (or a success without its payload).
    Failure { message: Option<String> },
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The backend's message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } | Self::Failure { message } => message.as_deref(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            Self::Success { data, message } => ApiResponse::Success {
                data: f(data),
                message,
            },
            Self::Failure { message } => ApiResponse::Failure { message },
        }
    }

    /// Collapse into a `Result`, turning a failure into [`ApiError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] carrying the backend message verbatim,
    /// or [`DEFAULT_REJECTION`] when there was none.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { message } => Err(ApiError::Rejected {
                message: message.unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            }),
        }
    }
}

impl<T> ApiResponse<Option<T>> {
    /// Treat a success without payload as a failure.
    #[must_use]
    pub fn required(self) -> ApiResponse<T> {
        match self {
            Self::Success {
                data: Some(data),
                message,
            } => ApiResponse::Success { data, message },
            Self::Success { data: None, message } | Self::Failure { message } => {
                ApiResponse::Failure { message }
            }
        }
    }
}

// =============================================================================
// Response envelopes
// =============================================================================

/// A backend response body that can be turned into an [`ApiResponse`].
pub(crate) trait Envelope: DeserializeOwned {
    type Data;

    fn into_response(self) -> ApiResponse<Self::Data>;
}

fn tag<T>(success: bool, data: T, message: Option<String>) -> ApiResponse<T> {
    if success {
        ApiResponse::Success { data, message }
    } else {
        ApiResponse::Failure { message }
    }
}

/// `{success, message?, cliente?}` - used by every customer endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub(crate) struct RecordEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cliente: Option<T>,
}

impl<T: DeserializeOwned> Envelope for RecordEnvelope<T> {
    type Data = Option<T>;

    fn into_response(self) -> ApiResponse<Option<T>> {
        tag(self.success, self.cliente, self.message)
    }
}

/// `{success, exists, message}` from `/clientes/validate`.
#[derive(Debug, Deserialize)]
pub(crate) struct ValidateEnvelope {
    success: bool,
    #[serde(default)]
    exists: bool,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope for ValidateEnvelope {
    type Data = bool;

    fn into_response(self) -> ApiResponse<bool> {
        tag(self.success, self.exists, self.message)
    }
}

/// `{success, produtos}` from `/produtos`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProdutosEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    produtos: Option<Vec<Produto>>,
}

impl Envelope for ProdutosEnvelope {
    type Data = Vec<Produto>;

    fn into_response(self) -> ApiResponse<Vec<Produto>> {
        tag(self.success, self.produtos, self.message).required()
    }
}

/// `/categorias` answers either `{success, categorias}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CategoriasEnvelope {
    Wrapped {
        success: bool,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        categorias: Option<Vec<Categoria>>,
    },
    Bare(Vec<Categoria>),
}

impl Envelope for CategoriasEnvelope {
    type Data = Vec<Categoria>;

    fn into_response(self) -> ApiResponse<Vec<Categoria>> {
        match self {
            Self::Wrapped {
                success,
                message,
                categorias,
            } => tag(success, categorias, message).required(),
            Self::Bare(categorias) => ApiResponse::Success {
                data: categorias,
                message: None,
            },
        }
    }
}

// =============================================================================
// Request bodies
// =============================================================================

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::ref_option)]
fn expose_optional_secret<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Body of `POST /clientes/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub senha: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
}

/// Body of `POST /clientes/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub senha: SecretString,
}

/// Body of `PUT /clientes/profile`. Unset fields are left untouched.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub id: CustomerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional_secret"
    )]
    pub senha_atual: Option<SecretString>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional_secret"
    )]
    pub nova_senha: Option<SecretString>,
}

/// Body of `POST /clientes/validate`.
#[derive(Debug, Serialize)]
pub struct ValidateEmailRequest {
    pub email: String,
}

/// Body of `PUT /user/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateUserRequest {
    pub id: CustomerId,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
}
