//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Maximum account name length, counted in characters after trimming
pub const MAX_NAME_LENGTH: usize = 50;

/// Minimum password length requirement (6 is the shortest accepted)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum length of the final label of an email domain
pub const MIN_TLD_LENGTH: usize = 2;

// =============================================================================
// Password hashing (Argon2id)
// =============================================================================

/// Default Argon2 memory cost in KiB
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;

/// Default Argon2 iteration count
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;

/// Default Argon2 degree of parallelism
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
