//! `elixir-cli`: the Elixir Control client for terminals and scripts.
//!
//! Runs the same core as the browser app. The session is persisted to a JSON
//! file instead of `localStorage`, and the routes the store would navigate to
//! are reported in the command output.

mod file_storage;
mod navigator;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use elixir_control::http::ReqwestTransport;
use elixir_control::iam::{SignInRequest, SignUpRequest};
use elixir_control::{
    AuthError, ClientConfig, ClientContext, ConfigError, HttpError, HttpResponse, Role, Session, StorageError,
};
use serde_json::{Value, json};

use crate::file_storage::FileStorage;
use crate::navigator::RecordingNavigator;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{}", .0.user_message())]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("not signed in; run `elixir-cli sign-in` first")]
    NotSignedIn,
}

#[derive(Parser, Debug)]
#[command(name = "elixir-cli", about = "Elixir Control appointment booking CLI")]
struct Cli {
    #[arg(long, env = "ELIXIR_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "ELIXIR_STATE_FILE", default_value = ".elixir-session.json")]
    state_file: PathBuf,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    SignIn {
        #[arg(long)]
        username: String,
        #[arg(long, env = "ELIXIR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    SignUp {
        #[arg(long)]
        username: String,
        #[arg(long, env = "ELIXIR_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long = "role", required = true, value_parser = ["PATIENT", "PSYCHOLOGIST"])]
        roles: Vec<String>,
    },
    SignOut,
    Whoami,
    Appointment(AppointmentCommand),
}

#[derive(Args, Debug)]
struct AppointmentCommand {
    #[command(subcommand)]
    command: AppointmentSubcommand,
}

#[derive(Subcommand, Debug)]
enum AppointmentSubcommand {
    List,
    ByPatient {
        patient_id: i64,
    },
    ByPsychologist {
        psychologist_id: i64,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_api_base_url(base_url)?;
    }
    let transport = ReqwestTransport::new()?;
    let storage = FileStorage::new(&cli.state_file);
    tracing::debug!(base_url = %config.api_base_url, state_file = %storage.path().display(), "starting");

    let ctx = ClientContext::new(config, Arc::new(transport), Arc::new(storage));
    let navigator = RecordingNavigator::default();

    let output = match cli.command {
        Command::SignIn { username, password } => {
            let response = ctx.auth.sign_in(&SignInRequest::new(username, password), &navigator).await?;
            tracing::info!(user_id = response.id, "signed in");
            let mut summary = session_summary(&ctx.auth.session());
            summary["route"] = route_value(&navigator);
            summary
        }
        Command::SignUp { username, password, roles } => {
            let response = ctx.auth.sign_up(&SignUpRequest::new(username, password, roles), &navigator).await?;
            json!({ "message": response.message, "route": route_value(&navigator) })
        }
        Command::SignOut => {
            ctx.auth.restore();
            ctx.auth.sign_out(&navigator);
            json!({ "signedIn": false, "route": route_value(&navigator) })
        }
        Command::Whoami => {
            if !ctx.auth.restore() {
                return Err(CliError::NotSignedIn);
            }
            session_summary(&ctx.auth.session())
        }
        Command::Appointment(appointment) => {
            if !ctx.auth.restore() {
                tracing::warn!("no saved session; sending request without a token");
            }
            let response = run_appointment(&ctx, appointment).await?;
            response_value(&response)
        }
    };

    print_json(&output)
}

async fn run_appointment(ctx: &ClientContext, appointment: AppointmentCommand) -> Result<HttpResponse, CliError> {
    let service = &ctx.appointments;
    let response = match appointment.command {
        AppointmentSubcommand::List => service.get_all().await?,
        AppointmentSubcommand::ByPatient { patient_id } => service.get_by_patient_id(patient_id).await?,
        AppointmentSubcommand::ByPsychologist { psychologist_id } => {
            service.get_by_psychologist_id(psychologist_id).await?
        }
        AppointmentSubcommand::Create { data } => {
            let body = serde_json::from_str::<Value>(&data)?;
            service.create(&body).await?
        }
        AppointmentSubcommand::Update { id, data } => {
            let body = serde_json::from_str::<Value>(&data)?;
            service.update(id, &body).await?
        }
        AppointmentSubcommand::Delete { id } => service.delete(id).await?,
    };
    Ok(response)
}

/// Public view of a session; never includes the token.
fn session_summary(session: &Session) -> Value {
    match session.user() {
        Some(user) => json!({
            "signedIn": true,
            "id": user.id,
            "username": user.username,
            "roles": user.roles.iter().map(Role::as_str).collect::<Vec<_>>(),
        }),
        None => json!({ "signedIn": false }),
    }
}

fn route_value(navigator: &RecordingNavigator) -> Value {
    navigator.last().map_or(Value::Null, |route| Value::from(route.name()))
}

/// Body of a response, or just its status when the body is empty.
fn response_value(response: &HttpResponse) -> Value {
    if response.data.is_null() { json!({ "status": response.status }) } else { response.data.clone() }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
