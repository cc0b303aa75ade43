//! session-client
//!
//! Command-line front end for the session-aware API client. Credentials are
//! kept in the configured store between invocations, so `login` followed by
//! `get /orders` reuses (and, when needed, refreshes) the session.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::broadcast;

use session_client::auth::{LoginRequest, RegisterRequest};
use session_client::config::{load_config, ClientConfig};
use session_client::observability::{logging, metrics};
use session_client::{user_message, ApiClient, ApiResult, LogoutEvent};

#[derive(Parser)]
#[command(name = "session-client")]
#[command(about = "API client with transparent session refresh", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the Prometheus metrics snapshot before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Role the account must hold (e.g. ROLE_ADMIN)
        #[arg(long)]
        role: Option<String>,
    },
    /// Create an account and store the session
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show the logged-in user
    Me,
    /// End the session
    Logout,
    /// GET a path relative to the base URL
    Get { path: String },
    /// POST a JSON body to a path
    Post { path: String, body: String },
    /// DELETE a path
    Delete { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    logging::init_logging(&config.observability);

    let metrics_handle = if config.observability.metrics_enabled || cli.metrics {
        metrics::init_metrics()
    } else {
        None
    };

    let client = ApiClient::from_config(&config)?;

    let mut logouts = client.subscribe_logout();
    let result = run(&client, cli.command).await;
    for notice in logout_notices(&mut logouts) {
        eprintln!("{}", notice);
    }

    let failed = match result {
        Ok(Value::Null) => false,
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            eprintln!("Error: {}", user_message(&e));
            true
        }
    };

    if cli.metrics {
        if let Some(handle) = metrics_handle {
            println!("{}", handle.render());
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// Drain the logout events raised while the command ran.
fn logout_notices(logouts: &mut broadcast::Receiver<LogoutEvent>) -> Vec<String> {
    let mut notices = Vec::new();
    loop {
        match logouts.try_recv() {
            Ok(event) => notices.push(format!(
                "Session ended ({}). Log in again at {}",
                event.reason.as_str(),
                event.redirect_to
            )),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    notices
}

async fn run(client: &ApiClient, command: Commands) -> ApiResult<Value> {
    match command {
        Commands::Login { email, password, role } => {
            let auth = client
                .login(&LoginRequest {
                    email,
                    password,
                    expected_role: role,
                })
                .await?;
            Ok(serde_json::to_value(auth.user).unwrap_or(Value::Null))
        }
        Commands::Register {
            email,
            password,
            full_name,
            phone,
        } => {
            let auth = client
                .register(&RegisterRequest {
                    email,
                    password,
                    full_name,
                    phone,
                })
                .await?;
            Ok(serde_json::to_value(auth.user).unwrap_or(Value::Null))
        }
        Commands::Me => {
            let user = client.current_user().await?;
            Ok(serde_json::to_value(user).unwrap_or(Value::Null))
        }
        Commands::Logout => {
            client.logout().await;
            Ok(Value::Null)
        }
        Commands::Get { path } => client.get(&path).await,
        Commands::Post { path, body } => {
            let body: Value = serde_json::from_str(&body)
                .map_err(|e| session_client::ApiError::Malformed(format!("request body: {}", e)))?;
            client.post(&path, body).await
        }
        Commands::Delete { path } => client.delete(&path).await,
    }
}
