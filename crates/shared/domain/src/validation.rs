//! Account candidate validation.
//!
//! Every rule runs on every call so a form can highlight all invalid fields
//! at once. Violations are reported in field order: name, email, password,
//! confirmation.

use serde::Serialize;
use thiserror::Error;

use crate::account::AccountCandidate;
use crate::constants::{MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::email::{is_valid_email, normalize_email};

/// A named reason a candidate record fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    NameBlank,
    NameTooLong,
    EmailBlank,
    EmailInvalidFormat,
    EmailTaken,
    PasswordBlank,
    PasswordTooShort,
    PasswordConfirmationMismatch,
}

impl Violation {
    /// Form field the violation belongs to
    pub fn field(&self) -> &'static str {
        match self {
            Violation::NameBlank | Violation::NameTooLong => "name",
            Violation::EmailBlank | Violation::EmailInvalidFormat | Violation::EmailTaken => {
                "email"
            }
            Violation::PasswordBlank | Violation::PasswordTooShort => "password",
            Violation::PasswordConfirmationMismatch => "password_confirmation",
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Violation::NameBlank => "NAME_BLANK",
            Violation::NameTooLong => "NAME_TOO_LONG",
            Violation::EmailBlank => "EMAIL_BLANK",
            Violation::EmailInvalidFormat => "EMAIL_INVALID_FORMAT",
            Violation::EmailTaken => "EMAIL_TAKEN",
            Violation::PasswordBlank => "PASSWORD_BLANK",
            Violation::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Violation::PasswordConfirmationMismatch => "PASSWORD_CONFIRMATION_MISMATCH",
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::NameBlank => write!(f, "Name can't be blank"),
            Violation::NameTooLong => {
                write!(f, "Name is too long (maximum is {} characters)", MAX_NAME_LENGTH)
            }
            Violation::EmailBlank => write!(f, "Email can't be blank"),
            Violation::EmailInvalidFormat => write!(f, "Email is invalid"),
            Violation::EmailTaken => write!(f, "Email has already been taken"),
            Violation::PasswordBlank => write!(f, "Password can't be blank"),
            Violation::PasswordTooShort => write!(
                f,
                "Password is too short (minimum is {} characters)",
                MIN_PASSWORD_LENGTH
            ),
            Violation::PasswordConfirmationMismatch => {
                write!(f, "Password confirmation doesn't match Password")
            }
        }
    }
}

/// One or more violations found in a candidate. Never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Validation failed: {}", summary(.violations))]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

fn summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationFailure {
    /// Wrap a violation list, returning `None` when it is empty.
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// Failure carrying a single violation
    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn contains(&self, violation: Violation) -> bool {
        self.violations.contains(&violation)
    }

    /// Human-readable messages, one per violation
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Turn a violation list into the validation result.
fn into_result(violations: Vec<Violation>) -> Result<(), ValidationFailure> {
    match ValidationFailure::from_violations(violations) {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

/// Validate a candidate, including email uniqueness.
///
/// `exists_with_email` receives the normalized email and is called exactly
/// once. It may block on a repository query.
pub fn validate<F>(candidate: &AccountCandidate, exists_with_email: F) -> Result<(), ValidationFailure>
where
    F: FnOnce(&str) -> bool,
{
    let taken = exists_with_email(&normalize_email(&candidate.email));

    let mut violations = check_name(&candidate.name);
    violations.extend(check_email(&candidate.email));
    if taken {
        violations.push(Violation::EmailTaken);
    }
    violations.extend(check_password(
        &candidate.password,
        candidate.password_confirmation.as_deref(),
    ));

    into_result(violations)
}

/// Run every rule except email uniqueness.
pub fn check_fields(candidate: &AccountCandidate) -> Vec<Violation> {
    let mut violations = check_name(&candidate.name);
    violations.extend(check_email(&candidate.email));
    violations.extend(check_password(
        &candidate.password,
        candidate.password_confirmation.as_deref(),
    ));
    violations
}

/// Validate only a password and its confirmation (password change).
pub fn validate_password(password: &str, confirmation: Option<&str>) -> Result<(), ValidationFailure> {
    into_result(check_password(password, confirmation))
}

fn check_name(name: &str) -> Vec<Violation> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        vec![Violation::NameBlank]
    } else if trimmed.chars().count() > MAX_NAME_LENGTH {
        vec![Violation::NameTooLong]
    } else {
        Vec::new()
    }
}

// A blank email is only reported as blank, not also as malformed.
fn check_email(email: &str) -> Vec<Violation> {
    if email.trim().is_empty() {
        vec![Violation::EmailBlank]
    } else if !is_valid_email(email.trim()) {
        vec![Violation::EmailInvalidFormat]
    } else {
        Vec::new()
    }
}

/// Password presence, minimum length and confirmation rules.
pub fn check_password(password: &str, confirmation: Option<&str>) -> Vec<Violation> {
    let mut violations = Vec::new();

    if password.trim().is_empty() {
        violations.push(Violation::PasswordBlank);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(Violation::PasswordTooShort);
    }
    match confirmation {
        Some(confirmation) if confirmation == password => {}
        _ => violations.push(Violation::PasswordConfirmationMismatch),
    }

    violations
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn valid_candidate() -> AccountCandidate {
        AccountCandidate::new("Example User", "user@example.com", "foobar", "foobar")
    }

    fn violations_of(candidate: &AccountCandidate) -> Vec<Violation> {
        match validate(candidate, |_| false) {
            Ok(()) => Vec::new(),
            Err(failure) => failure.violations().to_vec(),
        }
    }

    #[test]
    fn test_valid_candidate() {
        assert!(validate(&valid_candidate(), |_| false).is_ok());
    }

    #[test]
    fn test_name_not_present() {
        let mut candidate = valid_candidate();
        candidate.name = "".to_string();
        assert_eq!(violations_of(&candidate), vec![Violation::NameBlank]);

        candidate.name = "   ".to_string();
        assert_eq!(violations_of(&candidate), vec![Violation::NameBlank]);
    }

    #[test]
    fn test_name_too_long() {
        let mut candidate = valid_candidate();
        candidate.name = "a".repeat(51);
        assert_eq!(violations_of(&candidate), vec![Violation::NameTooLong]);

        candidate.name = "a".repeat(50);
        assert!(violations_of(&candidate).is_empty());

        // Surrounding whitespace does not count toward the limit
        candidate.name = format!("  {}  ", "a".repeat(50));
        assert!(violations_of(&candidate).is_empty());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut candidate = valid_candidate();
        candidate.name = "é".repeat(50);
        assert!(violations_of(&candidate).is_empty());
    }

    #[test]
    fn test_email_not_present() {
        let mut candidate = valid_candidate();
        candidate.email = " ".to_string();
        assert_eq!(violations_of(&candidate), vec![Violation::EmailBlank]);
    }

    #[test]
    fn test_email_format_invalid() {
        let addresses = [
            "user@foo,com",
            "user_at_foo.org",
            "example.user@foo.",
            "foo@bar_baz.com",
            "foo@bar+baz.com",
        ];
        for address in addresses {
            let mut candidate = valid_candidate();
            candidate.email = address.to_string();
            assert_eq!(
                violations_of(&candidate),
                vec![Violation::EmailInvalidFormat],
                "{address}"
            );
        }
    }

    #[test]
    fn test_email_format_valid() {
        let addresses = ["user@foo.COM", "A_US-ER@f.b.org", "frst.lst@foo.jp", "a+b@baz.cn"];
        for address in addresses {
            let mut candidate = valid_candidate();
            candidate.email = address.to_string();
            assert!(violations_of(&candidate).is_empty(), "{address}");
        }
    }

    #[test]
    fn test_email_taken_uses_normalized_email() {
        let mut candidate = valid_candidate();
        candidate.email = "USER@Example.COM".to_string();

        let failure = validate(&candidate, |email| email == "user@example.com").unwrap_err();
        assert_eq!(failure.violations(), &[Violation::EmailTaken]);
    }

    #[test]
    fn test_existence_check_called_exactly_once() {
        let calls = Cell::new(0);
        let mut candidate = valid_candidate();
        candidate.name = String::new();
        candidate.email = "not an email".to_string();

        let _ = validate(&candidate, |_| {
            calls.set(calls.get() + 1);
            false
        });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_password_not_present() {
        let mut candidate = valid_candidate();
        candidate.password = " ".to_string();
        candidate.password_confirmation = Some(" ".to_string());

        let violations = violations_of(&candidate);
        assert!(violations.contains(&Violation::PasswordBlank));
        assert!(!violations.contains(&Violation::PasswordConfirmationMismatch));
    }

    #[test]
    fn test_whitespace_password_of_valid_length_is_blank() {
        let mut candidate = valid_candidate();
        candidate.password = "      ".to_string();
        candidate.password_confirmation = Some("      ".to_string());
        assert_eq!(violations_of(&candidate), vec![Violation::PasswordBlank]);
    }

    #[test]
    fn test_empty_password_and_confirmation_is_presence_failure() {
        let mut candidate = valid_candidate();
        candidate.password = String::new();
        candidate.password_confirmation = Some(String::new());

        let violations = violations_of(&candidate);
        assert!(violations.contains(&Violation::PasswordBlank));
    }

    #[test]
    fn test_password_confirmation_mismatch() {
        let mut candidate = valid_candidate();
        candidate.password_confirmation = Some("mismatch".to_string());
        assert_eq!(
            violations_of(&candidate),
            vec![Violation::PasswordConfirmationMismatch]
        );
    }

    #[test]
    fn test_password_confirmation_absent() {
        let mut candidate = valid_candidate();
        candidate.password_confirmation = None;
        assert_eq!(
            violations_of(&candidate),
            vec![Violation::PasswordConfirmationMismatch]
        );
    }

    #[test]
    fn test_password_too_short() {
        let mut candidate = valid_candidate();
        candidate.password = "a".repeat(5);
        candidate.password_confirmation = Some("a".repeat(5));
        assert_eq!(violations_of(&candidate), vec![Violation::PasswordTooShort]);
    }

    #[test]
    fn test_password_minimum_length() {
        // Exactly 6 characters is accepted
        let mut candidate = valid_candidate();
        candidate.password = "a".repeat(6);
        candidate.password_confirmation = Some("a".repeat(6));
        assert!(violations_of(&candidate).is_empty());
    }

    #[test]
    fn test_reports_every_violation_in_field_order() {
        let candidate = AccountCandidate {
            name: String::new(),
            email: "user@foo,com".to_string(),
            password: "abc".to_string(),
            password_confirmation: None,
        };

        let failure = validate(&candidate, |_| true).unwrap_err();
        assert_eq!(
            failure.violations(),
            &[
                Violation::NameBlank,
                Violation::EmailInvalidFormat,
                Violation::EmailTaken,
                Violation::PasswordTooShort,
                Violation::PasswordConfirmationMismatch,
            ]
        );
    }

    #[test]
    fn test_check_fields_skips_uniqueness() {
        assert!(check_fields(&valid_candidate()).is_empty());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1", Some("secret1")).is_ok());

        let failure = validate_password("short", Some("other")).unwrap_err();
        assert!(failure.contains(Violation::PasswordTooShort));
        assert!(failure.contains(Violation::PasswordConfirmationMismatch));
    }

    #[test]
    fn test_failure_messages_and_fields() {
        let failure = ValidationFailure::single(Violation::PasswordTooShort);

        assert_eq!(
            failure.messages(),
            vec!["Password is too short (minimum is 6 characters)".to_string()]
        );
        assert_eq!(Violation::PasswordConfirmationMismatch.field(), "password_confirmation");
        assert_eq!(Violation::EmailTaken.code(), "EMAIL_TAKEN");
        assert!(failure.to_string().starts_with("Validation failed: "));
        assert!(ValidationFailure::from_violations(Vec::new()).is_none());
    }
}
