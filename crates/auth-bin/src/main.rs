use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use secureauth_common::{AuthPhase, StrengthLevel, UserRecord};
use secureauth_lib::{
    auth::{self, AuthService},
    config::Settings,
    AppState,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Mock sign-up/sign-in with AI security tips
#[derive(Parser, Debug)]
#[command(name = "secureauth", version)]
struct Cli {
    /// Config file (defaults to ./secureauth.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the credential store directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out of the current session
    Logout,
    /// Show the current session and decoded token
    Whoami,
    /// Ask for a welcome message with a security tip
    Advice,
    /// Rate a password
    Strength { password: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    Ok(settings)
}

async fn run(command: Command, settings: Settings) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings)?;
    let phase = state.auth.initialize()?;
    debug!(?phase, "session restored");

    match command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = report(state.auth.register(&name, &email, &password).await)?;
            println!("Welcome, {}! Your account has been created.", user.name);
            print_dashboard(&state, &user).await;
        }
        Command::Login { email, password } => {
            let user = report(state.auth.login(&email, &password).await)?;
            print_dashboard(&state, &user).await;
        }
        Command::Logout => {
            state.auth.logout();
            println!("Signed out.");
        }
        Command::Whoami => {
            let session = state.auth.session();
            match (session.user, session.token) {
                (Some(user), Some(token)) if phase == AuthPhase::Authenticated => {
                    println!("{} <{}> id={}", user.name, user.email, user.id);
                    println!("member since {}", user.created_at);
                    match auth::decode_claims(&token) {
                        Some(claims) => println!("token exp={}", claims.exp),
                        None => println!("token could not be decoded"),
                    }
                }
                _ => println!("Not signed in."),
            }
        }
        Command::Advice => match state.auth.current_user() {
            Some(user) => println!("{}", state.advice.welcome_advice(&user.name).await),
            None => println!("Not signed in."),
        },
        Command::Strength { password } => {
            let monitor = state.strength_monitor();
            let mut readings = monitor.subscribe();
            let version = monitor.input(&password);
            if password.chars().count() < state.settings.strength.min_length {
                println!(
                    "Too short to analyze (minimum {} characters).",
                    state.settings.strength.min_length
                );
                return Ok(());
            }
            let reading = readings
                .wait_for(|r| r.version == version && r.strength.is_some())
                .await?
                .clone();
            if let Some(strength) = reading.strength {
                let level = match strength.level() {
                    StrengthLevel::Weak => "weak",
                    StrengthLevel::Fair => "fair",
                    StrengthLevel::Strong => "strong",
                };
                println!("{}/5 ({level}) AI: {}", strength.score, strength.feedback);
            }
        }
    }
    Ok(())
}

/// Print the user-facing message of a failed operation and keep the error
fn report<T>(result: Result<T, secureauth_lib::error::AppError>) -> anyhow::Result<T> {
    result.map_err(|e| {
        eprintln!("{}", e.user_message());
        anyhow::anyhow!("{} ({})", e, e.error_code())
    })
}

async fn print_dashboard<S>(state: &AppState<S>, user: &UserRecord)
where
    S: secureauth_lib::storage::CredentialStore,
{
    let initial = user.initial().unwrap_or('?');
    println!("[{initial}] {} <{}>", user.name, user.email);
    println!("Account created: {}", user.created_at);
    println!("AI Security Assistant: \"{}\"", state.advice.welcome_advice(&user.name).await);
}
