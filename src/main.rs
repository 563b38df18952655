//! clinic-auth - command-line front end for the clinic sign-in and sign-up flows
//!
//! The session is kept in a JSON file (`CLINIC_SESSION_FILE`) standing in for
//! the browser's `localStorage`.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clinic_auth::core::auth::{
    AuthService, AuthState, FileStorage, User, submit_sign_in, submit_sign_up,
};
use clinic_auth::core::clinics::fetch_clinics;
use clinic_auth::core::config::Config;
use clinic_auth::core::validation::{SignInInput, SignUpInput};
use serde_json::json;

#[derive(Debug, Parser)]
#[command(
    name = "clinic-auth",
    version,
    about = "Sign in to the clinic scheduling API and manage the local session."
)]
struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "CLINIC_API_URL")]
    api_url: Option<String>,

    /// File holding the persisted session
    #[arg(long, global = true, env = "CLINIC_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account attached to a clinic
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm_password: Option<String>,
        /// ADMIN, PROFESSIONAL or RECEPTIONIST
        #[arg(long, default_value = "PROFESSIONAL")]
        role: String,
        #[arg(long)]
        clinic_id: String,
    },

    /// Sign out and forget the local session
    SignOut,

    /// Exchange the refresh token for a new token pair
    Refresh,

    /// Show whether the stored session is valid
    Status,

    /// Print the stored user
    Whoami,

    /// List clinics available on sign-up
    Clinics,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = Config::from_env();
    if let Some(url) = cli.api_url {
        config = config.api_url(url);
    }
    if let Some(path) = cli.session_file {
        config = config.session_file(path);
    }

    tracing::debug!(
        "Using API {} with session file {:?}",
        config.base_url(),
        config.session_file
    );

    let storage = FileStorage::new(&config.session_file);
    let auth = AuthService::new(&config, storage)?;
    let json = cli.json;

    match cli.command {
        Command::SignIn { email, password } => {
            let outcome = submit_sign_in(&auth, &SignInInput::new(email, password)).await?;
            print_message(json, &outcome.message, outcome.user.as_ref());
        }
        Command::SignUp {
            name,
            email,
            password,
            confirm_password,
            role,
            clinic_id,
        } => {
            let input = SignUpInput {
                name: Some(name),
                email: Some(email),
                password: Some(password),
                confirm_password,
                role: Some(role),
                clinic_id: Some(clinic_id),
            };
            let outcome = submit_sign_up(&auth, &input).await?;
            print_message(json, &outcome.message, outcome.user.as_ref());
        }
        Command::SignOut => {
            auth.logout().await;
            print_message(json, "Signed out", None);
        }
        Command::Refresh => {
            auth.refresh_token().await?;
            print_message(json, "Token refreshed", auth.current_user().as_ref());
        }
        Command::Status => print_state(json, auth.state()),
        Command::Whoami => match auth.current_user() {
            Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
            Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
            None => return Err("No stored user".into()),
        },
        Command::Clinics => {
            let clinics = fetch_clinics(auth.client()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&clinics)?);
            } else if clinics.is_empty() {
                println!("No clinics available");
            } else {
                for clinic in clinics {
                    println!("{}\t{}", clinic.id, clinic.name);
                }
            }
        }
    }

    Ok(())
}

fn print_message(json: bool, message: &str, user: Option<&User>) {
    if json {
        println!("{}", json!({ "message": message, "user": user }));
    } else {
        println!("{}", message);
    }
}

fn print_state(json: bool, state: AuthState) {
    let (label, user) = match &state {
        AuthState::Authenticated(user) => ("authenticated", Some(user)),
        AuthState::Expired(user) => ("expired", Some(user)),
        AuthState::Unauthenticated => ("unauthenticated", None),
    };

    if json {
        println!("{}", json!({ "state": label, "user": user }));
        return;
    }

    match state {
        AuthState::Authenticated(user) => {
            println!("Signed in as {} <{}>", user.name, user.email)
        }
        AuthState::Expired(user) => println!(
            "Session for {} has expired; run `clinic-auth refresh`",
            user.email
        ),
        AuthState::Unauthenticated => println!("Not signed in"),
    }
}
