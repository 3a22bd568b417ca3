//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::normalize_email;
use crate::password::PasswordDigest;

/// Persisted account.
///
/// Identity is the `id`: two `Account` values describe the same account
/// exactly when their ids are equal, so no `PartialEq` is derived.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Email as the user typed it, kept for display
    pub email: String,
    /// Lower-cased copy used for uniqueness and lookup
    pub email_normalized: String,
    #[serde(skip_serializing)]
    pub password_digest: PasswordDigest,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build an account from a pending insert, with a fresh id and timestamps.
    pub fn from_new(id: Uuid, new: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: new.name,
            email: new.email,
            email_normalized: new.email_normalized,
            password_digest: new.password_digest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether both values refer to the same stored account
    pub fn is_same_account(&self, other: &Account) -> bool {
        self.id == other.id
    }

    /// Replace the stored digest after a validated password change
    pub fn replace_digest(&mut self, digest: PasswordDigest) {
        self.password_digest = digest;
        self.updated_at = Utc::now();
    }
}

/// Account data handed to the repository for insertion.
///
/// The repository assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub email_normalized: String,
    pub password_digest: PasswordDigest,
}

impl NewAccount {
    /// Assemble an insert from a validated candidate and its digest.
    ///
    /// Consumes the candidate so the plaintext does not outlive the digest.
    pub fn from_candidate(candidate: AccountCandidate, password_digest: PasswordDigest) -> Self {
        let email_normalized = normalize_email(&candidate.email);
        Self {
            name: candidate.name.trim().to_string(),
            email: candidate.email.trim().to_string(),
            email_normalized,
            password_digest,
        }
    }
}

/// Proposed account record for a registration attempt.
#[derive(Clone, Default, Deserialize)]
pub struct AccountCandidate {
    /// Display name (1-50 characters after trimming)
    pub name: String,
    /// Email address
    pub email: String,
    /// Plaintext password (minimum 6 characters)
    pub password: String,
    /// Must be present and equal to `password`
    pub password_confirmation: Option<String>,
}

impl AccountCandidate {
    /// Create a candidate with a confirmation set.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            password_confirmation: Some(password_confirmation.into()),
        }
    }
}

// Never print plaintext passwords
impl std::fmt::Debug for AccountCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCandidate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field(
                "password_confirmation",
                &self.password_confirmation.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address as registered
    pub email: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest() -> PasswordDigest {
        PasswordDigest::from_stored("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string())
    }

    #[test]
    fn test_new_account_normalizes_email_but_keeps_display_casing() {
        let candidate = AccountCandidate::new(" Example User ", "User@Example.COM", "foobar", "foobar");
        let new = NewAccount::from_candidate(candidate, digest());

        assert_eq!(new.name, "Example User");
        assert_eq!(new.email, "User@Example.COM");
        assert_eq!(new.email_normalized, "user@example.com");
    }

    #[test]
    fn test_identity_is_the_id() {
        let candidate = AccountCandidate::new("Example User", "user@example.com", "foobar", "foobar");
        let new = NewAccount::from_candidate(candidate, digest());
        let account = Account::from_new(Uuid::new_v4(), new.clone());
        let mut renamed = account.clone();
        renamed.name = "Someone Else".to_string();
        let other = Account::from_new(Uuid::new_v4(), new);

        assert!(account.is_same_account(&renamed));
        assert!(!account.is_same_account(&other));
    }

    #[test]
    fn test_candidate_debug_redacts_passwords() {
        let candidate = AccountCandidate::new("Example User", "user@example.com", "hunter22", "hunter22");
        let printed = format!("{:?}", candidate);

        assert!(!printed.contains("hunter22"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn test_serialized_account_omits_digest() {
        let candidate = AccountCandidate::new("Example User", "user@example.com", "foobar", "foobar");
        let account = Account::from_new(Uuid::new_v4(), NewAccount::from_candidate(candidate, digest()));

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_digest"));
        assert!(!json.contains("argon2"));

        let response = serde_json::to_value(AccountResponse::from(&account)).unwrap();
        assert_eq!(response["email"], "user@example.com");
        assert!(response.get("password_digest").is_none());
    }
}
