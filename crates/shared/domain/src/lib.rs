//! Domain layer - Core account entities, validation and credentials.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The only I/O it performs is through caller-supplied closures.

pub mod account;
pub mod constants;
pub mod email;
pub mod error;
pub mod password;
pub mod validation;

pub use account::{Account, AccountCandidate, AccountResponse, NewAccount};
pub use constants::*;
pub use email::{is_valid_email, normalize_email};
pub use error::{DomainError, DomainResult};
pub use password::{CredentialStore, HashingParams, PasswordDigest};
pub use validation::{ValidationFailure, Violation};
