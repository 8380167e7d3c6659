//! Integration tests for the Santa Fe storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p santafe-integration-tests
//! ```
//!
//! Every test starts its own [`MockBackend`]: an in-process axum server on
//! `127.0.0.1:0` that speaks the storefront backend's JSON API under `/api`
//! and counts the requests it receives. It can be switched to answer `503`
//! to everything, which is how the failover tests take a backend "down".
//!
//! # Test Categories
//!
//! - `failover` - endpoint probing and sticky failover
//! - `clientes_api` - `/clientes/*` and `/user/*` wrappers
//! - `catalog` - products, categories and the catalog cache
//! - `auth_flow` - login/signup/profile/logout through `AppState`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Timestamp reported as every mock account's creation time.
pub const CREATED_AT: &str = "2025-03-01T12:00:00Z";

// =============================================================================
// Mock state
// =============================================================================

#[derive(Debug, Clone)]
struct MockUser {
    id: String,
    nome: String,
    email: String,
    senha: String,
    telefone: Option<String>,
    cpf: Option<String>,
    endereco: Option<String>,
    cidade: Option<String>,
    estado: Option<String>,
    cep: Option<String>,
}

impl MockUser {
    fn cliente_json(&self) -> Value {
        json!({
            "id": self.id,
            "nome": self.nome,
            "email": self.email,
            "telefone": self.telefone,
            "endereco": self.endereco,
            "createdAt": CREATED_AT,
        })
    }

    fn user_json(&self) -> Value {
        json!({
            "id": self.id,
            "nome": self.nome,
            "email": self.email,
            "telefone": self.telefone,
            "cpf": self.cpf,
            "endereco": self.endereco,
            "cidade": self.cidade,
            "estado": self.estado,
            "cep": self.cep,
            "createdAt": CREATED_AT,
            "updatedAt": CREATED_AT,
        })
    }
}

#[derive(Default)]
struct MockState {
    down: AtomicBool,
    bare_categorias: AtomicBool,
    omit_user_echo: AtomicBool,
    delay_ms: AtomicU64,
    next_id: AtomicUsize,
    hits: Mutex<HashMap<String, usize>>,
    users: Mutex<HashMap<String, MockUser>>,
}

impl MockState {
    fn users(&self) -> std::sync::MutexGuard<'_, HashMap<String, MockUser>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn find_by_email(&self, email: &str) -> Option<MockUser> {
        self.users()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }
}

fn str_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

// =============================================================================
// Handlers
// =============================================================================

fn categorias() -> Value {
    json!([
        {"id": "graos", "nome": "Grãos", "descricao": "Arroz, feijão e cereais"},
        {"id": "bebidas", "nome": "Bebidas"},
    ])
}

fn produtos() -> Value {
    json!([
        {"id": 101, "nome": "Arroz Tipo 1 5kg", "preco": 24.99, "estoque": 40,
         "categoria": {"id": "graos", "nome": "Grãos"}},
        {"id": 102, "nome": "Feijão Preto 1kg", "preco": "8.99",
         "categoria": {"id": "graos", "nome": "Grãos"}},
        {"id": 103, "nome": "Suco de Uva 1L", "preco": 12.5, "imagem": "suco.png",
         "categoria": {"id": "bebidas", "nome": "Bebidas"}},
    ])
}

async fn get_categorias(State(state): State<Arc<MockState>>) -> Json<Value> {
    if state.bare_categorias.load(Ordering::SeqCst) {
        Json(categorias())
    } else {
        Json(json!({"success": true, "categorias": categorias()}))
    }
}

async fn get_produtos() -> Json<Value> {
    Json(json!({"success": true, "produtos": produtos()}))
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    let (Some(nome), Some(email), Some(senha)) = (
        str_field(&body, "nome"),
        str_field(&body, "email"),
        str_field(&body, "senha"),
    ) else {
        return Json(json!({"success": false, "message": "Dados incompletos"}));
    };

    if state.find_by_email(&email).is_some() {
        return Json(json!({"success": false, "message": "Email já cadastrado"}));
    }

    let id = format!("c{}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    let user = MockUser {
        id: id.clone(),
        nome,
        email,
        senha,
        telefone: str_field(&body, "telefone"),
        cpf: None,
        endereco: str_field(&body, "endereco"),
        cidade: None,
        estado: None,
        cep: None,
    };
    let cliente = user.cliente_json();
    state.users().insert(id, user);

    Json(json!({"success": true, "message": "Cadastro realizado com sucesso", "cliente": cliente}))
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    let email = str_field(&body, "email").unwrap_or_default();
    let senha = str_field(&body, "senha").unwrap_or_default();

    match state.find_by_email(&email) {
        Some(user) if user.senha == senha => Json(json!({
            "success": true,
            "message": "Login realizado com sucesso",
            "cliente": user.cliente_json(),
        })),
        _ => Json(json!({"success": false, "message": "Email ou senha incorretos"})),
    }
}

#[derive(Deserialize)]
struct ProfileQuery {
    id: String,
}

async fn get_profile(
    State(state): State<Arc<MockState>>,
    Query(query): Query<ProfileQuery>,
) -> Json<Value> {
    match state.users().get(&query.id) {
        Some(user) => Json(json!({"success": true, "cliente": user.cliente_json()})),
        None => Json(json!({"success": false, "message": "Cliente não encontrado"})),
    }
}

async fn update_profile(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let id = str_field(&body, "id").unwrap_or_default();
    let mut users = state.users();
    let Some(user) = users.get_mut(&id) else {
        return Json(json!({"success": false, "message": "Cliente não encontrado"}));
    };

    if let Some(nova) = str_field(&body, "novaSenha") {
        if str_field(&body, "senhaAtual").as_deref() != Some(user.senha.as_str()) {
            return Json(json!({"success": false, "message": "Senha atual incorreta"}));
        }
        user.senha = nova;
    }
    if let Some(nome) = str_field(&body, "nome") {
        user.nome = nome;
    }
    if let Some(telefone) = str_field(&body, "telefone") {
        user.telefone = Some(telefone);
    }
    if let Some(endereco) = str_field(&body, "endereco") {
        user.endereco = Some(endereco);
    }

    Json(json!({
        "success": true,
        "message": "Perfil atualizado com sucesso",
        "cliente": user.cliente_json(),
    }))
}

async fn validate_email(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let email = str_field(&body, "email").unwrap_or_default();
    let exists = state.find_by_email(&email).is_some();
    let message = if exists { "Email já cadastrado" } else { "Email disponível" };
    Json(json!({"success": true, "exists": exists, "message": message}))
}

async fn get_user(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Json<Value> {
    match state.users().get(&id) {
        Some(user) => Json(json!({"success": true, "cliente": user.user_json()})),
        None => Json(json!({"success": false, "message": "Usuário não encontrado"})),
    }
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let omit_echo = state.omit_user_echo.load(Ordering::SeqCst);
    let mut users = state.users();
    let Some(user) = users.get_mut(&id) else {
        return Json(json!({"success": false, "message": "Usuário não encontrado"}));
    };

    if let Some(nome) = str_field(&body, "nome") {
        user.nome = nome;
    }
    if let Some(email) = str_field(&body, "email") {
        user.email = email;
    }
    user.telefone = str_field(&body, "telefone");
    user.cpf = str_field(&body, "cpf");
    user.endereco = str_field(&body, "endereco");
    user.cidade = str_field(&body, "cidade");
    user.estado = str_field(&body, "estado");
    user.cep = str_field(&body, "cep");

    if omit_echo {
        Json(json!({"success": true, "message": "Dados atualizados"}))
    } else {
        Json(json!({
            "success": true,
            "message": "Dados atualizados",
            "cliente": user.user_json(),
        }))
    }
}

/// Count every request, wait out the configured delay, and answer 503 while
/// the backend is "down".
async fn track(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    let path = request
        .uri()
        .path()
        .strip_prefix("/api")
        .unwrap_or_else(|| request.uri().path())
        .to_string();
    *state
        .hits
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(path)
        .or_default() += 1;

    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
    }
    next.run(request).await
}

// =============================================================================
// MockBackend
// =============================================================================

/// In-process fake of the storefront backend.
///
/// The server task is aborted on drop.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(MockState::default());

        let api = Router::new()
            .route("/categorias", get(get_categorias))
            .route("/produtos", get(get_produtos))
            .route("/clientes/register", post(register))
            .route("/clientes/login", post(login))
            .route("/clientes/profile", get(get_profile).put(update_profile))
            .route("/clientes/validate", post(validate_email))
            .route("/user/{id}", get(get_user).put(update_user))
            .layer(middleware::from_fn_with_state(Arc::clone(&state), track))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL to configure the client with (`http://127.0.0.1:PORT/api`).
    ///
    /// # Panics
    ///
    /// Never: a socket address always forms a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("valid mock URL")
    }

    /// Answer `503` to everything while `down` is true.
    pub fn set_down(&self, down: bool) {
        self.state.down.store(down, Ordering::SeqCst);
    }

    /// Hold every response for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.state.delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Serve `/categorias` as a bare JSON array instead of an envelope.
    pub fn set_bare_categorias(&self, bare: bool) {
        self.state.bare_categorias.store(bare, Ordering::SeqCst);
    }

    /// Leave the record out of `PUT /user/{id}` responses.
    pub fn set_omit_user_echo(&self, omit: bool) {
        self.state.omit_user_echo.store(omit, Ordering::SeqCst);
    }

    /// Requests received for `path` (relative to `/api`), including ones
    /// answered with `503`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Requests received on any path.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.state
            .hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    /// Create an account directly, bypassing the API. Returns its ID.
    pub fn seed_user(&self, nome: &str, email: &str, senha: &str) -> String {
        let id = format!("c{}", self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.state.users().insert(
            id.clone(),
            MockUser {
                id: id.clone(),
                nome: nome.to_string(),
                email: email.to_string(),
                senha: senha.to_string(),
                telefone: None,
                cpf: None,
                endereco: None,
                cidade: None,
                estado: None,
                cep: None,
            },
        );
        id
    }

    /// Current password of an account, if it exists.
    #[must_use]
    pub fn password_of(&self, id: &str) -> Option<String> {
        self.state.users().get(id).map(|u| u.senha.clone())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A base URL nothing listens on: the port was bound, then released.
///
/// # Errors
///
/// Returns an error if no ephemeral port can be bound.
pub fn unreachable_url() -> std::io::Result<Url> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Url::parse(&format!("http://{addr}/api"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}
