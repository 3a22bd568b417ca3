//! Account service - registration, authentication and password changes.
//!
//! Glues the domain validator and credential store to an account
//! repository. The credential state of an account only moves from "unset"
//! (a candidate in memory) to "committed" (a digest in storage) after
//! validation succeeds.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::validation::{self, Violation};
use domain::{normalize_email, Account, AccountCandidate, CredentialStore, NewAccount};

use crate::repository::AccountRepository;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Validate a candidate and persist it with a password digest.
    ///
    /// Fails with every violation found; nothing is stored in that case.
    async fn register(&self, candidate: AccountCandidate) -> AppResult<Account>;

    /// Return the account when the password matches, `None` otherwise.
    ///
    /// An unknown email and a wrong password are indistinguishable.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<Account>>;

    /// Validate a new password and overwrite the stored digest.
    async fn change_password(
        &self,
        id: Uuid,
        password: String,
        password_confirmation: Option<String>,
    ) -> AppResult<Account>;
}

/// Concrete implementation of AccountService using a repository.
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
    credentials: Arc<CredentialStore>,
}

impl AccountManager {
    /// Create new account service instance
    pub fn new(repo: Arc<dyn AccountRepository>, credentials: Arc<CredentialStore>) -> Self {
        Self { repo, credentials }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, candidate: AccountCandidate) -> AppResult<Account> {
        let taken = self.repo.exists(&normalize_email(&candidate.email)).await?;

        if let Err(failure) = validation::validate(&candidate, |_| taken) {
            debug!(violations = failure.violations().len(), "Registration rejected");
            return Err(failure.into());
        }

        let digest = self.credentials.digest(&candidate.password)?;
        let account = match self
            .repo
            .insert(NewAccount::from_candidate(candidate, digest))
            .await
        {
            Ok(account) => account,
            // Lost a race with a concurrent registration for the same email
            Err(AppError::Conflict(_)) => return Err(AppError::violation(Violation::EmailTaken)),
            Err(e) => return Err(e),
        };

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<Account>> {
        let normalized = normalize_email(email);
        let found = self.repo.find_by_normalized_email(&normalized).await?;

        let account = self
            .credentials
            .authenticate(&normalized, password, move |_| found);

        match &account {
            Some(account) => debug!(account_id = %account.id, "Authentication succeeded"),
            None => debug!("Authentication failed"),
        }
        Ok(account)
    }

    async fn change_password(
        &self,
        id: Uuid,
        password: String,
        password_confirmation: Option<String>,
    ) -> AppResult<Account> {
        validation::validate_password(&password, password_confirmation.as_deref())?;

        let mut account = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        account.replace_digest(self.credentials.digest(&password)?);

        let account = self.repo.update(account).await?;
        info!(account_id = %account.id, "Password changed");
        Ok(account)
    }
}
