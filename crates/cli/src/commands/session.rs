//! Session commands: login, signup, logout, whoami, email-exists.

use secrecy::SecretString;

use santafe_client::models::UserProfile;
use santafe_client::services::AuthError;
use santafe_client::validators::{FieldErrors, LoginForm, SignupForm};
use santafe_client::{AppError, AppState};
use santafe_core::Email;

/// Signup input collected from the command line.
pub struct SignupArgs {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

#[allow(clippy::print_stderr)]
fn print_field_errors<F: Ord + std::fmt::Display>(errors: &FieldErrors<F>) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

#[allow(clippy::print_stdout)]
pub fn print_profile(profile: &UserProfile) {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("ID:        {}", profile.id);
    println!("Nome:      {}", profile.nome);
    println!("Email:     {}", profile.email);
    println!("Telefone:  {}", field(&profile.telefone));
    println!("CPF:       {}", field(&profile.cpf));
    println!("Endereço:  {}", field(&profile.endereco));
    println!("Cidade:    {}", field(&profile.cidade));
    println!("Estado:    {}", field(&profile.estado));
    println!("CEP:       {}", field(&profile.cep));
    println!("Criado em: {}", profile.created_at.format("%d/%m/%Y"));
}

/// Log in and persist the session.
///
/// # Errors
///
/// Returns an error if validation fails or the backend refuses the login.
#[allow(clippy::print_stdout)]
pub async fn login(state: &AppState, email: String, password: SecretString) -> Result<(), AppError> {
    let form = LoginForm { email, password };
    if let Err(errors) = form.validate() {
        print_field_errors(&errors);
        return Err(AuthError::InvalidLogin(errors).into());
    }
    super::connect(state).await;

    match state.auth().login(&form).await {
        Ok(profile) => {
            println!("Bem-vindo, {}!", profile.nome);
            Ok(())
        }
        Err(e) => {
            print_field_errors(&e.login_errors());
            Err(e.into())
        }
    }
}

/// Create an account and persist the session.
///
/// # Errors
///
/// Returns an error if validation fails or the backend refuses the signup.
#[allow(clippy::print_stdout)]
pub async fn signup(state: &AppState, args: SignupArgs) -> Result<(), AppError> {
    let form = SignupForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        password: args.password,
        confirm_password: args.confirm_password,
    };

    if let Err(errors) = form.validate() {
        print_field_errors(&errors);
        return Err(AuthError::InvalidSignup(errors).into());
    }
    super::connect(state).await;

    match state.auth().signup(&form).await {
        Ok(profile) => {
            println!("Conta criada para {} <{}>", profile.nome, profile.email);
            Ok(())
        }
        Err(e) => {
            print_field_errors(&e.signup_errors());
            Err(e.into())
        }
    }
}

/// End the session.
///
/// # Errors
///
/// Returns an error if the session file cannot be updated.
#[allow(clippy::print_stdout)]
pub async fn logout(state: &AppState) -> Result<(), AppError> {
    state.auth().logout().await?;
    println!("Sessão encerrada");
    Ok(())
}

/// Show the stored session, optionally refreshed from the backend.
///
/// # Errors
///
/// Returns an error if there is no session or the refresh fails.
pub async fn whoami(state: &AppState, refresh: bool) -> Result<(), AppError> {
    let auth = state.auth();
    let profile = if refresh {
        auth.current_user().await?.ok_or(AuthError::NotLoggedIn)?;
        super::connect(state).await;
        auth.refresh_profile().await?
    } else {
        auth.current_user().await?.ok_or(AuthError::NotLoggedIn)?
    };

    print_profile(&profile);
    Ok(())
}

/// Report whether an email is registered.
///
/// # Errors
///
/// Returns an error for a malformed email or if the backend cannot be reached.
#[allow(clippy::print_stdout)]
pub async fn email_exists(state: &AppState, email: &str) -> Result<(), AppError> {
    Email::parse(email).map_err(AuthError::from)?;
    super::connect(state).await;

    if state.auth().email_exists(email).await? {
        println!("{email}: já cadastrado");
    } else {
        println!("{email}: disponível");
    }
    Ok(())
}
