//! Santa Fe CLI - storefront client from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Check which backend answers
//! santafe probe
//!
//! # Start a session
//! santafe login -e ana@example.com -p 's3nha'
//!
//! # Browse the catalog
//! santafe products --categoria graos
//!
//! # Price a cart
//! santafe cart --line 101:24.99:2 --line 104:15.99:1
//! ```
//!
//! # Environment Variables
//!
//! See `santafe_client::config` for `SANTAFE_*` and `SENTRY_*`. `RUST_LOG`
//! controls log verbosity.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use santafe_client::{AppError, AppState, ClientConfig};

mod commands;

use commands::cart::LineSpec;

#[derive(Parser)]
#[command(name = "santafe")]
#[command(author, version, about = "Santa Fe storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every configured backend and select the active one
    Probe,
    /// Log in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "SANTAFE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and store the session
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Account password
        #[arg(short, long, env = "SANTAFE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami {
        /// Re-read the customer record from the backend first
        #[arg(long)]
        refresh: bool,
    },
    /// Manage the logged-in user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List products
    Products {
        /// Only products of this category ID
        #[arg(short, long)]
        categoria: Option<String>,
    },
    /// List categories
    Categories,
    /// Check whether an email is registered
    EmailExists {
        /// Email to check
        email: String,
    },
    /// Compute a cart summary from product lines
    Cart {
        /// Line as `product_id:unit_price:quantity`; repeatable
        #[arg(short, long = "line", required = true)]
        lines: Vec<LineSpec>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Load and show the full profile
    Show,
    /// Update profile fields
    Update(commands::profile::UpdateArgs),
    /// Change the password
    Password {
        /// Current password
        #[arg(long)]
        current: String,

        /// New password
        #[arg(long)]
        new: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    use secrecy::ExposeSecret;

    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.expose_secret(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Owned(
                config
                    .sentry_environment
                    .clone()
                    .unwrap_or_else(|| config.environment.as_str().to_string()),
            )),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry: errors and warnings become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "santafe_client=info,santafe_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(AppError::from(e)),
    };

    if let Err(e) = result {
        let message = e.report();
        tracing::error!("Command failed: {e}");
        eprintln!("{message}");
        // exit() skips destructors; flush pending events first.
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), AppError> {
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Probe => commands::catalog::probe(&state).await,
        Commands::Login { email, password } => {
            commands::session::login(&state, email, SecretString::from(password)).await
        }
        Commands::Signup {
            name,
            email,
            phone,
            password,
            confirm_password,
        } => {
            let confirm = confirm_password.unwrap_or_else(|| password.clone());
            commands::session::signup(
                &state,
                commands::session::SignupArgs {
                    name,
                    email,
                    phone,
                    password: SecretString::from(password),
                    confirm_password: SecretString::from(confirm),
                },
            )
            .await
        }
        Commands::Logout => commands::session::logout(&state).await,
        Commands::Whoami { refresh } => commands::session::whoami(&state, refresh).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&state).await,
            ProfileAction::Update(args) => commands::profile::update(&state, args).await,
            ProfileAction::Password { current, new } => {
                commands::profile::change_password(
                    &state,
                    SecretString::from(current),
                    SecretString::from(new),
                )
                .await
            }
        },
        Commands::Products { categoria } => {
            commands::catalog::products(&state, categoria.as_deref()).await
        }
        Commands::Categories => commands::catalog::categories(&state).await,
        Commands::EmailExists { email } => commands::session::email_exists(&state, &email).await,
        Commands::Cart { lines } => commands::cart::summarize(&state, lines).await,
    }
}
