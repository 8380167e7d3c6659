//! Login, signup, profile and logout through `AppState`.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use rust_decimal::Decimal;
use secrecy::SecretString;

use santafe_client::services::AuthError;
use santafe_client::services::auth::LOGIN_REJECTED;
use santafe_client::validators::{LoginField, LoginForm, ProfileForm, SignupField, SignupForm};
use santafe_client::{AppState, ClientConfig};
use santafe_core::{CartLine, ProductId};
use santafe_integration_tests::MockBackend;

fn state(backend: &MockBackend, session_file: &Path) -> AppState {
    let config = ClientConfig {
        api_urls: vec![backend.base_url()],
        session_file: session_file.to_path_buf(),
        ..ClientConfig::default()
    };
    AppState::new(config).unwrap()
}

fn login_form(email: &str, password: &str) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: SecretString::from(password),
    }
}

fn signup_form(email: &str) -> SignupForm {
    SignupForm {
        name: "  Ana Souza ".to_string(),
        email: email.to_string(),
        phone: None,
        password: SecretString::from("123456"),
        confirm_password: SecretString::from("123456"),
    }
}

#[tokio::test]
async fn test_signup_persists_session_across_restarts() {
    let backend = MockBackend::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    let profile = state(&backend, &session_file)
        .auth()
        .signup(&signup_form("ana@example.com"))
        .await
        .unwrap();
    assert_eq!(profile.nome, "Ana Souza");
    assert!(profile.cpf.is_none());
    assert!(profile.updated_at >= profile.created_at);

    let restarted = state(&backend, &session_file);
    let current = restarted.auth().current_user().await.unwrap().unwrap();
    assert_eq!(current, profile);
    assert!(restarted.session().is_logged_in().await.unwrap());
}

#[tokio::test]
async fn test_duplicate_signup_lands_on_email_field() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana", "ana@example.com", "123456");
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));

    let err = state
        .auth()
        .signup(&signup_form("ana@example.com"))
        .await
        .unwrap_err();
    assert_eq!(
        err.signup_errors().get(&SignupField::Email),
        Some("Email já cadastrado")
    );
    assert!(!state.session().is_logged_in().await.unwrap());
}

#[tokio::test]
async fn test_login_rejection_lands_on_password_field() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana", "ana@example.com", "123456");
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));

    let err = state
        .auth()
        .login(&login_form("ana@example.com", "errada"))
        .await
        .unwrap_err();
    assert!(matches!(&err, AuthError::Rejected { message } if message == "Email ou senha incorretos"));
    assert_eq!(
        err.login_errors().get(&LoginField::Password),
        Some("Email ou senha incorretos")
    );
    assert_ne!(err.user_message(), LOGIN_REJECTED);
}

#[tokio::test]
async fn test_malformed_email_never_reaches_backend() {
    let backend = MockBackend::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));

    let err = state
        .auth()
        .login(&login_form("ana.example.com", "123456"))
        .await
        .unwrap_err();
    assert_eq!(
        err.login_errors().get(&LoginField::Email),
        Some("E-mail inválido")
    );

    let err = state.auth().email_exists("sem arroba").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail(_)));

    assert_eq!(backend.total_hits(), 0);
}

#[tokio::test]
async fn test_profile_update_and_reload() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana Souza", "ana@example.com", "123456");
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));
    let auth = state.auth();

    auth.login(&login_form("ana@example.com", "123456")).await.unwrap();

    let form = ProfileForm {
        nome: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        cpf: Some("123.456.789-09".to_string()),
        cidade: Some(" Recife ".to_string()),
        estado: Some("PE".to_string()),
        cep: Some("50000000".to_string()),
        ..Default::default()
    };
    let updated = auth.update_profile(&form).await.unwrap();
    assert_eq!(updated.cidade.as_deref(), Some("Recife"));

    let stored = auth.current_user().await.unwrap().unwrap();
    assert_eq!(stored.cpf.as_deref(), Some("123.456.789-09"));

    let loaded = auth.load_profile().await.unwrap();
    assert_eq!(loaded.cep.as_deref(), Some("50000000"));

    // The basic record refresh keeps the document fields.
    let refreshed = auth.refresh_profile().await.unwrap();
    assert_eq!(refreshed.cpf.as_deref(), Some("123.456.789-09"));
}

#[tokio::test]
async fn test_profile_update_without_echo_updates_locally() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana Souza", "ana@example.com", "123456");
    backend.set_omit_user_echo(true);
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));
    let auth = state.auth();

    auth.login(&login_form("ana@example.com", "123456")).await.unwrap();
    let form = ProfileForm {
        nome: "Ana Lima".to_string(),
        email: "ana@example.com".to_string(),
        estado: Some("SP".to_string()),
        ..Default::default()
    };
    let updated = auth.update_profile(&form).await.unwrap();
    assert_eq!(updated.nome, "Ana Lima");
    assert_eq!(
        auth.current_user().await.unwrap().unwrap().estado.as_deref(),
        Some("SP")
    );
}

#[tokio::test]
async fn test_invalid_profile_is_not_sent() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana Souza", "ana@example.com", "123456");
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));
    let auth = state.auth();

    auth.login(&login_form("ana@example.com", "123456")).await.unwrap();
    let form = ProfileForm {
        nome: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        cep: Some("123".to_string()),
        ..Default::default()
    };
    let err = auth.update_profile(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "CEP inválido");
    assert_eq!(backend.hits("/user/c1"), 0);
}

#[tokio::test]
async fn test_change_password() {
    let backend = MockBackend::start().await.unwrap();
    let id = backend.seed_user("Ana Souza", "ana@example.com", "antiga");
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));
    let auth = state.auth();

    auth.login(&login_form("ana@example.com", "antiga")).await.unwrap();

    let err = auth
        .change_password(SecretString::from("chute"), SecretString::from("nova123"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Senha atual incorreta");

    auth.change_password(SecretString::from("antiga"), SecretString::from("nova123"))
        .await
        .unwrap();
    assert_eq!(backend.password_of(&id).as_deref(), Some("nova123"));
}

#[tokio::test]
async fn test_logout_clears_session_and_cart() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana Souza", "ana@example.com", "123456");
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));

    state
        .auth()
        .login(&login_form("ana@example.com", "123456"))
        .await
        .unwrap();
    let line = CartLine::new(ProductId::new(101), "Arroz Tipo 1 5kg", Decimal::new(2499, 2), 2)
        .unwrap();
    state.cart().add_line(line).await;
    assert_eq!(state.cart().summary().await.total_items, 2);

    state.auth().logout().await.unwrap();
    assert!(state.auth().current_user().await.unwrap().is_none());
    assert!(state.cart().snapshot().await.is_empty());
}

#[tokio::test]
async fn test_email_exists() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana Souza", "ana@example.com", "123456");
    let dir = tempfile::tempdir().unwrap();
    let state = state(&backend, &dir.path().join("session.json"));

    assert!(state.auth().email_exists(" ana@example.com ").await.unwrap());
    assert!(!state.auth().email_exists("bia@example.com").await.unwrap());
}

#[tokio::test]
async fn test_truncated_session_file_does_not_block_login() {
    let backend = MockBackend::start().await.unwrap();
    backend.seed_user("Ana Souza", "ana@example.com", "123456");
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    std::fs::write(&session_file, r#"{"@santafe:cliente": "trunc"#).unwrap();

    let state = state(&backend, &session_file);
    assert!(!state.session().is_logged_in().await.unwrap());

    state
        .auth()
        .login(&login_form("ana@example.com", "123456"))
        .await
        .unwrap();
    assert!(state.session().is_logged_in().await.unwrap());

    state.auth().logout().await.unwrap();
    assert!(!state.session().is_logged_in().await.unwrap());
}
