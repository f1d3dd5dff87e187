//! Tabula Command Line Interface
//!
//! Usage:
//!   tabula init                 - Create the database schema
//!   tabula serve                - Start the API server
//!   tabula user create|list     - Manage users
//!   tabula session issue        - Issue a session token for a user

use clap::{Parser, Subcommand};
use tabula_api::{init_logging, run_server, ApiConfig, LogFormat};

mod commands;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Tabula sheet service CLI")]
#[command(version)]
struct Cli {
    /// SQLite database path (`:memory:` for a throwaway database)
    #[arg(long, env = "TABULA_DATABASE", default_value = "tabula.db", global = true)]
    db: String,

    /// Log output format (pretty, compact, json)
    #[arg(long, env = "TABULA_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema
    Init,

    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage sessions
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum UserCommands {
    /// Create a user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address (unique)
        #[arg(short, long)]
        email: String,
    },
    /// List users
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum SessionCommands {
    /// Issue a bearer token for a user
    Issue {
        /// User ID or email
        user: String,
        /// Lifetime in hours
        #[arg(long, default_value_t = tabula_core::DEFAULT_SESSION_TTL_HOURS)]
        hours: i64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_format) {
        eprintln!("Error: failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match cli.command {
        Commands::Init => {
            println!("Initializing Tabula database at {}...", cli.db);
            commands::open_database(&cli.db)?;
            println!("Database schema initialized successfully.");
            Ok(())
        }

        Commands::Serve {
            host,
            port,
            no_cors,
        } => {
            let mut config = ApiConfig::from_env();
            config.database_path = cli.db;
            config.log_format = cli.log_format;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if no_cors {
                config.enable_cors = false;
            }

            tracing::info!(host = %config.host, port = config.port, "Starting Tabula API server");
            run_server(config).await?;
            Ok(())
        }

        Commands::User { action } => commands::handle_user_command(action, &cli.db).await,

        Commands::Session { action } => commands::handle_session_command(action, &cli.db).await,
    }
}
