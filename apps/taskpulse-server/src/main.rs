//! Taskpulse - HTTP API server for personal task tracking

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use taskpulse_common::DATABASE_FILENAME;
use taskpulse_core::{TaskStore, TaskpulseConfig};
use taskpulse_server::{api, auth};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskpulse", version, about = "Personal task tracking service")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "TASKPULSE_DATABASE_PATH")]
    database: Option<PathBuf>,

    /// Secret used to verify session tokens
    #[arg(long, env = "TASKPULSE_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server
    Serve {
        /// Port to bind to
        #[arg(long, env = "TASKPULSE_PORT")]
        port: Option<u16>,
    },
    /// Mint a session token for local development
    Token {
        /// User id to place in the token's `sub` claim
        #[arg(long)]
        user: String,
        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match cli.jwt_secret {
        Some(secret) => {
            let database = cli
                .database
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILENAME));
            TaskpulseConfig::new(database, secret)
        }
        None => TaskpulseConfig::from_env().context("configuration")?,
    };

    match cli.command {
        Command::Serve { port } => {
            let config = match port {
                Some(port) => config.with_port(port),
                None => config,
            };
            serve(config).await
        }
        Command::Token { user, ttl_hours } => {
            let token = auth::issue_token(&config.jwt_secret, &user, ttl_hours)?;
            println!("{token}");
            Ok(())
        }
    }
}

async fn serve(config: TaskpulseConfig) -> anyhow::Result<()> {
    let store = TaskStore::connect(&config.database_path)
        .await
        .context("opening task database")?;

    let port = config.port;
    let state = api::AppState {
        store,
        config: Arc::new(config),
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    info!("taskpulse API listening on port {port}");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
