//! Account repository backed by SeaORM.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::{Account, NewAccount};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
///
/// Lookups take the normalized (lower-cased) email. Implementations must
/// reject a second account with the same normalized email.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Check whether an account with this normalized email exists
    async fn exists(&self, normalized_email: &str) -> AppResult<bool>;

    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by normalized email
    async fn find_by_normalized_email(&self, normalized_email: &str) -> AppResult<Option<Account>>;

    /// Insert a new account, assigning its id and timestamps
    async fn insert(&self, account: NewAccount) -> AppResult<Account>;

    /// Persist changes to an existing account, refreshing `updated_at`
    async fn update(&self, account: Account) -> AppResult<Account>;
}

/// Concrete implementation of AccountRepository over SeaORM
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map write errors, turning unique index hits into conflicts.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn exists(&self, normalized_email: &str) -> AppResult<bool> {
        let count = AccountEntity::find()
            .filter(account::Column::EmailNormalized.eq(normalized_email))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_by_normalized_email(&self, normalized_email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::EmailNormalized.eq(normalized_email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(account.name),
            email: Set(account.email),
            email_normalized: Set(account.email_normalized),
            password_digest: Set(account.password_digest.into_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        Ok(Account::from(model))
    }

    async fn update(&self, account: Account) -> AppResult<Account> {
        let existing = AccountEntity::find_by_id(account.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(account.name);
        active.email = Set(account.email);
        active.email_normalized = Set(account.email_normalized);
        active.password_digest = Set(account.password_digest.into_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        Ok(Account::from(model))
    }
}
