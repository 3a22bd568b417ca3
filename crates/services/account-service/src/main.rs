//! Account Service - command-line entry point.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use account_service_lib::config::AccountServiceConfig;
use account_service_lib::service::AccountService;
use account_service_lib::MigrateAction;
use common::AppError;
use domain::{AccountCandidate, AccountResponse};

#[derive(Parser)]
#[command(name = "account-service")]
#[command(about = "Account registration and credential verification")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Register a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    /// Check an email and password pair
    Authenticate {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Replace the password of an existing account
    ChangePassword {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: Option<String>,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AccountServiceConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            account_service_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let service = account_service_lib::connect(&config).await?;
            let candidate = AccountCandidate {
                name,
                email,
                password,
                password_confirmation,
            };
            match service.register(candidate).await {
                Ok(account) => print_account(&AccountResponse::from(account))?,
                Err(err) => fail(err)?,
            }
        }
        Commands::Authenticate { email, password } => {
            let service = account_service_lib::connect(&config).await?;
            match service.authenticate(&email, &password).await? {
                Some(account) => print_account(&AccountResponse::from(account))?,
                None => {
                    eprintln!("Invalid email or password");
                    std::process::exit(1);
                }
            }
        }
        Commands::ChangePassword {
            id,
            password,
            password_confirmation,
        } => {
            let service = account_service_lib::connect(&config).await?;
            match service
                .change_password(id, password, password_confirmation)
                .await
            {
                Ok(account) => print_account(&AccountResponse::from(account))?,
                Err(err) => fail(err)?,
            }
        }
    }

    Ok(())
}

/// Initialize tracing subscriber (verbose mode sets debug level)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn print_account(account: &AccountResponse) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(account)?);
    Ok(())
}

/// Print the error body and exit with a failure status.
fn fail(err: AppError) -> Result<(), serde_json::Error> {
    eprintln!("{}", serde_json::to_string_pretty(&err.to_body())?);
    std::process::exit(1);
}
