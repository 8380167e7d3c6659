//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use santafe_core::CustomerId;

/// A customer as returned by the `/clientes/*` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    /// Backend-assigned customer ID.
    pub id: CustomerId,
    /// Display name.
    pub nome: String,
    /// Login email.
    pub email: String,
    /// Phone number, if provided at signup or later.
    #[serde(default)]
    pub telefone: Option<String>,
    /// Street address, if provided.
    #[serde(default)]
    pub endereco: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The full profile kept for the logged-in user.
///
/// Extends [`Cliente`] with the document and address fields managed through
/// `/user/{id}`. After login or signup those extra fields are unknown to the
/// client and start out empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: CustomerId,
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub telefone: Option<String>,
    /// CPF (Brazilian taxpayer number), formatted or digits only.
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    /// Two-letter state code (UF).
    #[serde(default)]
    pub estado: Option<String>,
    /// CEP (postal code).
    #[serde(default)]
    pub cep: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build a profile from a freshly authenticated customer.
    ///
    /// `cpf`, `cidade`, `estado` and `cep` are unset and `updated_at` is `now`.
    #[must_use]
    pub fn from_cliente(cliente: Cliente, now: DateTime<Utc>) -> Self {
        Self {
            id: cliente.id,
            nome: cliente.nome,
            email: cliente.email,
            telefone: cliente.telefone,
            cpf: None,
            endereco: cliente.endereco,
            cidade: None,
            estado: None,
            cep: None,
            created_at: cliente.created_at,
            updated_at: now,
        }
    }

    /// Fold a refreshed [`Cliente`] record into this profile, keeping the
    /// fields the `/clientes` endpoints do not return.
    pub fn merge_cliente(&mut self, cliente: Cliente, now: DateTime<Utc>) {
        self.nome = cliente.nome;
        self.email = cliente.email;
        self.telefone = cliente.telefone;
        self.endereco = cliente.endereco;
        self.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cliente_json() -> &'static str {
        r#"{
            "id": "c1",
            "nome": "Ana Souza",
            "email": "ana@example.com",
            "telefone": null,
            "createdAt": "2025-03-01T12:00:00Z"
        }"#
    }

    #[test]
    fn test_cliente_deserializes_backend_shape() {
        let cliente: Cliente = serde_json::from_str(cliente_json()).unwrap();
        assert_eq!(cliente.id, CustomerId::new("c1"));
        assert_eq!(cliente.telefone, None);
        assert_eq!(cliente.endereco, None);
    }

    #[test]
    fn test_profile_defaults_client_side_fields() {
        let cliente: Cliente = serde_json::from_str(cliente_json()).unwrap();
        let now: DateTime<Utc> = "2025-04-01T08:30:00Z".parse().unwrap();
        let profile = UserProfile::from_cliente(cliente.clone(), now);

        assert_eq!(profile.nome, "Ana Souza");
        assert_eq!(profile.created_at, cliente.created_at);
        assert_eq!(profile.updated_at, now);
        assert!(profile.cpf.is_none());
        assert!(profile.cidade.is_none());
        assert!(profile.estado.is_none());
        assert!(profile.cep.is_none());
    }

    #[test]
    fn test_profile_serializes_camel_case() {
        let cliente: Cliente = serde_json::from_str(cliente_json()).unwrap();
        let profile = UserProfile::from_cliente(cliente, Utc::now());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("cpf").unwrap().is_null());
    }

    #[test]
    fn test_merge_keeps_document_fields() {
        let cliente: Cliente = serde_json::from_str(cliente_json()).unwrap();
        let mut profile = UserProfile::from_cliente(cliente.clone(), Utc::now());
        profile.cpf = Some("123.456.789-09".to_string());

        let mut renamed = cliente;
        renamed.nome = "Ana S. Lima".to_string();
        profile.merge_cliente(renamed, Utc::now());

        assert_eq!(profile.nome, "Ana S. Lima");
        assert_eq!(profile.cpf.as_deref(), Some("123.456.789-09"));
    }
}
