//! In-process account repository.
//!
//! Keeps accounts in a map guarded by a tokio `RwLock`. The normalized-email
//! index is checked under the write lock, so it enforces uniqueness the same
//! way the database's unique index does.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Account, NewAccount};

use super::AccountRepository;

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    /// normalized email -> account id
    by_email: HashMap<String, Uuid>,
}

/// Account repository held entirely in memory
#[derive(Default)]
pub struct MemoryAccountStore {
    tables: RwLock<Tables>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountStore {
    async fn exists(&self, normalized_email: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.by_email.contains_key(normalized_email))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_normalized_email(&self, normalized_email: &str) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_email
            .get(normalized_email)
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        if tables.by_email.contains_key(&account.email_normalized) {
            return Err(AppError::conflict("Email"));
        }

        let account = Account::from_new(Uuid::new_v4(), account);
        tables
            .by_email
            .insert(account.email_normalized.clone(), account.id);
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, mut account: Account) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        let previous_email = match tables.accounts.get(&account.id) {
            Some(stored) => stored.email_normalized.clone(),
            None => return Err(AppError::NotFound),
        };

        if previous_email != account.email_normalized {
            if tables.by_email.contains_key(&account.email_normalized) {
                return Err(AppError::conflict("Email"));
            }
            tables.by_email.remove(&previous_email);
            tables
                .by_email
                .insert(account.email_normalized.clone(), account.id);
        }

        account.updated_at = chrono::Utc::now();
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use domain::PasswordDigest;

    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Example User".to_string(),
            email: email.to_string(),
            email_normalized: email.to_lowercase(),
            password_digest: PasswordDigest::from_stored("$argon2id$stub".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryAccountStore::new();
        let account = store.insert(new_account("User@Example.com")).await.unwrap();

        assert_eq!(account.email, "User@Example.com");
        assert_eq!(account.created_at, account.updated_at);
        assert!(store.exists("user@example.com").await.unwrap());
        assert!(!store.exists("User@Example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_normalized_email() {
        let store = MemoryAccountStore::new();
        store.insert(new_account("user@example.com")).await.unwrap();

        let result = store.insert(new_account("USER@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_normalized_email_and_id() {
        let store = MemoryAccountStore::new();
        let account = store.insert(new_account("user@example.com")).await.unwrap();

        let by_email = store
            .find_by_normalized_email("user@example.com")
            .await
            .unwrap()
            .unwrap();
        let by_id = store.find_by_id(account.id).await.unwrap().unwrap();

        assert_eq!(by_email.id, account.id);
        assert_eq!(by_id.id, account.id);
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_and_refreshes_timestamp() {
        let store = MemoryAccountStore::new();
        let mut account = store.insert(new_account("user@example.com")).await.unwrap();
        let created_at = account.created_at;

        account.password_digest = PasswordDigest::from_stored("$argon2id$other".to_string());
        let updated = store.update(account).await.unwrap();

        assert_eq!(updated.password_digest.as_str(), "$argon2id$other");
        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at >= created_at);
    }

    #[tokio::test]
    async fn test_update_moves_email_index() {
        let store = MemoryAccountStore::new();
        let mut account = store.insert(new_account("old@example.com")).await.unwrap();
        store.insert(new_account("taken@example.com")).await.unwrap();

        account.email = "taken@example.com".to_string();
        account.email_normalized = "taken@example.com".to_string();
        let result = store.update(account.clone()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        account.email = "new@example.com".to_string();
        account.email_normalized = "new@example.com".to_string();
        store.update(account).await.unwrap();
        assert!(!store.exists("old@example.com").await.unwrap());
        assert!(store.exists("new@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_unknown_account() {
        let store = MemoryAccountStore::new();
        let account = Account::from_new(Uuid::new_v4(), new_account("user@example.com"));

        let result = store.update(account).await;
        assert!(matches!(result, Err(AppError::NotFound)));
        assert!(store.is_empty().await);
    }
}
