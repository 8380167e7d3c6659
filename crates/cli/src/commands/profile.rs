//! Profile commands.

use clap::Args;
use secrecy::SecretString;

use santafe_client::services::AuthError;
use santafe_client::validators::ProfileForm;
use santafe_client::{AppError, AppState};

use super::session::print_profile;

/// Fields for `profile update`. Omitted fields keep their stored value.
#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub nome: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub telefone: Option<String>,
    #[arg(long)]
    pub cpf: Option<String>,
    #[arg(long)]
    pub endereco: Option<String>,
    #[arg(long)]
    pub cidade: Option<String>,
    /// Two-letter state code
    #[arg(long)]
    pub estado: Option<String>,
    #[arg(long)]
    pub cep: Option<String>,
}

/// Load the full profile from the backend and show it.
///
/// # Errors
///
/// Returns an error if there is no session or the backend call fails.
pub async fn show(state: &AppState) -> Result<(), AppError> {
    state.auth().current_user().await?.ok_or(AuthError::NotLoggedIn)?;
    super::connect(state).await;

    let profile = state.auth().load_profile().await?;
    print_profile(&profile);
    Ok(())
}

/// Merge the given fields over the stored profile and save.
///
/// # Errors
///
/// Returns an error if there is no session, validation fails or the backend
/// refuses the update.
#[allow(clippy::print_stderr)]
pub async fn update(state: &AppState, args: UpdateArgs) -> Result<(), AppError> {
    let auth = state.auth();
    let current = auth.current_user().await?.ok_or(AuthError::NotLoggedIn)?;

    let form = ProfileForm {
        nome: args.nome.unwrap_or(current.nome),
        email: args.email.unwrap_or(current.email),
        telefone: args.telefone.or(current.telefone),
        cpf: args.cpf.or(current.cpf),
        endereco: args.endereco.or(current.endereco),
        cidade: args.cidade.or(current.cidade),
        estado: args.estado.or(current.estado),
        cep: args.cep.or(current.cep),
    };
    if let Err(errors) = form.validate() {
        for (field, message) in errors.iter() {
            eprintln!("  {field}: {message}");
        }
        return Err(AuthError::InvalidProfile(errors).into());
    }
    super::connect(state).await;

    let profile = auth.update_profile(&form).await?;
    print_profile(&profile);
    Ok(())
}

/// Change the password.
///
/// # Errors
///
/// Returns an error if there is no session, the new password is too short
/// or the backend refuses the change.
#[allow(clippy::print_stdout)]
pub async fn change_password(
    state: &AppState,
    current: SecretString,
    new: SecretString,
) -> Result<(), AppError> {
    let auth = state.auth();
    auth.current_user().await?.ok_or(AuthError::NotLoggedIn)?;
    super::connect(state).await;

    auth.change_password(current, new).await?;
    println!("Senha alterada");
    Ok(())
}
