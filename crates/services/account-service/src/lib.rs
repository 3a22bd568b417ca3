//! Account Service Library
//!
//! Registration, authentication and password changes over an account
//! repository. Validation and hashing live in the `domain` crate; this
//! crate supplies the repository implementations and the service glue.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::{AppResult, HashingConfig};
use domain::CredentialStore;

use crate::config::AccountServiceConfig;
use crate::infra::Database;
use crate::repository::AccountStore;
use crate::service::AccountManager;

/// Build the credential store from hashing configuration.
pub fn credential_store(config: &HashingConfig) -> AppResult<CredentialStore> {
    Ok(CredentialStore::new(config.params(), config.equalize_timing)?)
}

/// Connect to the database (applying migrations) and build the service.
pub async fn connect(config: &AccountServiceConfig) -> AppResult<AccountManager> {
    let db = Database::connect(&config.database).await?;

    let account_repo = Arc::new(AccountStore::new(db.get_connection()));
    let credentials = Arc::new(credential_store(&config.hashing)?);

    Ok(AccountManager::new(account_repo, credentials))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &AccountServiceConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations");
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
