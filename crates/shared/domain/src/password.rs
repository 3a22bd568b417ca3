//! Password digests and the credential store.
//!
//! The credential store owns the one-way transformation from plaintext to
//! a stored Argon2id digest and the verification of a plaintext against it.
//! The salt and cost parameters travel inside the PHC-formatted digest.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::account::Account;
use crate::constants::{DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_HASH_PARALLELISM};
use crate::error::{DomainError, DomainResult};

/// Stored password digest value object.
///
/// The only password-derived value that is ever persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

// Don't expose the digest in debug output
impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PasswordDigest").field(&"[REDACTED]").finish()
    }
}

impl PasswordDigest {
    /// Wrap a digest loaded from storage.
    pub fn from_stored(digest: String) -> Self {
        Self(digest)
    }

    /// Get the digest string for storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the digest string.
    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<PasswordDigest> for String {
    fn from(digest: PasswordDigest) -> Self {
        digest.0
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Hashes plaintext passwords and verifies them against stored digests.
///
/// Holds no mutable state; safe to share behind an `Arc`.
#[derive(Clone)]
pub struct CredentialStore {
    argon2: Argon2<'static>,
    /// Digest verified against when no account matches, so unknown emails
    /// cost as much as wrong passwords.
    decoy: Option<PasswordDigest>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("params", self.argon2.params())
            .field("equalize_timing", &self.decoy.is_some())
            .finish()
    }
}

impl CredentialStore {
    /// Build a credential store with the given cost parameters.
    ///
    /// With `equalize_timing` set, a decoy digest is computed up front and
    /// verified whenever an authentication finds no account.
    ///
    /// # Errors
    /// Returns `InvalidInput` if Argon2 rejects the parameters.
    pub fn new(params: HashingParams, equalize_timing: bool) -> DomainResult<Self> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| DomainError::invalid_input(format!("Invalid hashing parameters: {}", e)))?;

        let mut store = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy: None,
        };
        if equalize_timing {
            store.decoy = Some(store.hash("decoy password for unknown accounts")?);
        }

        Ok(store)
    }

    /// Compute a salted digest of a plaintext password.
    ///
    /// Equal plaintexts produce different digests across calls.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty plaintext, `Internal` if the
    /// hashing backend fails.
    pub fn digest(&self, plaintext: &str) -> DomainResult<PasswordDigest> {
        if plaintext.is_empty() {
            return Err(DomainError::invalid_input("Password to digest is empty"));
        }
        self.hash(plaintext)
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// Mismatches and unparseable digests both yield `false`.
    pub fn verify(&self, plaintext: &str, stored: &PasswordDigest) -> bool {
        match PasswordHash::new(stored.as_str()) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Look up an account and return it only if the password matches.
    ///
    /// "No such account" and "wrong password" are both `None`.
    pub fn authenticate<F>(&self, normalized_email: &str, plaintext: &str, lookup: F) -> Option<Account>
    where
        F: FnOnce(&str) -> Option<Account>,
    {
        match lookup(normalized_email) {
            Some(account) => self
                .verify(plaintext, &account.password_digest)
                .then_some(account),
            None => {
                if let Some(decoy) = &self.decoy {
                    let _ = self.verify(plaintext, decoy);
                }
                None
            }
        }
    }

    fn hash(&self, plaintext: &str) -> DomainResult<PasswordDigest> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(PasswordDigest(hash.to_string()))
    }
}
