//! `/clientes/*` and `/user/*` wrappers against the mock backend.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use santafe_client::ClientConfig;
use santafe_client::api::{
    ApiClient, ApiResponse, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UpdateUserRequest,
};
use santafe_core::CustomerId;
use santafe_integration_tests::MockBackend;

fn api(backend: &MockBackend) -> ApiClient {
    let config = ClientConfig {
        api_urls: vec![backend.base_url()],
        ..ClientConfig::default()
    };
    ApiClient::from_config(&config).unwrap()
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        nome: "Ana Souza".to_string(),
        email: email.to_string(),
        senha: SecretString::from("123456"),
        telefone: Some("11999990000".to_string()),
        endereco: None,
    }
}

#[tokio::test]
async fn test_register_then_duplicate() {
    let backend = MockBackend::start().await.unwrap();
    let api = api(&backend);

    let cliente = api
        .register(&register_request("ana@example.com"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(cliente.nome, "Ana Souza");
    assert_eq!(cliente.telefone.as_deref(), Some("11999990000"));

    let duplicate = api.register(&register_request("ana@example.com")).await.unwrap();
    assert_eq!(
        duplicate,
        ApiResponse::Failure {
            message: Some("Email já cadastrado".to_string())
        }
    );
}

#[tokio::test]
async fn test_login_success_and_rejection() {
    let backend = MockBackend::start().await.unwrap();
    let id = backend.seed_user("Ana Souza", "ana@example.com", "s3nha-forte");
    let api = api(&backend);

    let ok = api
        .login(&LoginRequest {
            email: "ana@example.com".to_string(),
            senha: SecretString::from("s3nha-forte"),
        })
        .await
        .unwrap();
    assert_eq!(ok.message(), Some("Login realizado com sucesso"));
    assert_eq!(ok.into_result().unwrap().id, CustomerId::new(id));

    let rejected = api
        .login(&LoginRequest {
            email: "ana@example.com".to_string(),
            senha: SecretString::from("errada"),
        })
        .await
        .unwrap();
    assert!(!rejected.is_success());
    assert_eq!(rejected.message(), Some("Email ou senha incorretos"));
}

#[tokio::test]
async fn test_get_profile() {
    let backend = MockBackend::start().await.unwrap();
    let id = backend.seed_user("Ana Souza", "ana@example.com", "123456");
    let api = api(&backend);

    let cliente = api
        .get_profile(&CustomerId::new(id))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(cliente.email, "ana@example.com");

    let missing = api.get_profile(&CustomerId::new("nope")).await.unwrap();
    assert_eq!(missing.message(), Some("Cliente não encontrado"));
}

#[tokio::test]
async fn test_update_profile_changes_password() {
    let backend = MockBackend::start().await.unwrap();
    let id = backend.seed_user("Ana Souza", "ana@example.com", "antiga");
    let api = api(&backend);

    let wrong = api
        .update_profile(&UpdateProfileRequest {
            id: CustomerId::new(id.clone()),
            senha_atual: Some(SecretString::from("chute")),
            nova_senha: Some(SecretString::from("nova123")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(wrong.message(), Some("Senha atual incorreta"));
    assert_eq!(backend.password_of(&id).as_deref(), Some("antiga"));

    let ok = api
        .update_profile(&UpdateProfileRequest {
            id: CustomerId::new(id.clone()),
            senha_atual: Some(SecretString::from("antiga")),
            nova_senha: Some(SecretString::from("nova123")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(ok.is_success());
    assert_eq!(backend.password_of(&id).as_deref(), Some("nova123"));
}

#[tokio::test]
async fn test_validate_email() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana Souza", "ana@example.com", "123456");
    let api = api(&backend);

    let taken = api.validate_email("ana@example.com").await.unwrap();
    assert_eq!(taken.message(), Some("Email já cadastrado"));
    assert!(taken.into_result().unwrap());

    let free = api.validate_email("bia@example.com").await.unwrap();
    assert!(!free.into_result().unwrap());
}

#[tokio::test]
async fn test_user_roundtrip() {
    let backend = MockBackend::start().await.unwrap();
    let id = CustomerId::new(backend.seed_user("Ana Souza", "ana@example.com", "123456"));
    let api = api(&backend);

    let before = api.get_user(&id).await.unwrap().into_result().unwrap();
    assert!(before.cpf.is_none());

    let updated = api
        .update_user(&UpdateUserRequest {
            id: id.clone(),
            nome: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            telefone: None,
            cpf: Some("123.456.789-09".to_string()),
            endereco: Some("Rua das Flores, 10".to_string()),
            cidade: Some("Recife".to_string()),
            estado: Some("PE".to_string()),
            cep: Some("50000-000".to_string()),
        })
        .await
        .unwrap()
        .into_result()
        .unwrap()
        .unwrap();
    assert_eq!(updated.cidade.as_deref(), Some("Recife"));

    let after = api.get_user(&id).await.unwrap().into_result().unwrap();
    assert_eq!(after.cpf.as_deref(), Some("123.456.789-09"));
    assert_eq!(after.estado.as_deref(), Some("PE"));
}
