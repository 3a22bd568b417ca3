//! Email normalization and format checks.

use once_cell::sync::Lazy;
use regex::Regex;

/// `local@label(.label)*.tld`: the local part takes letters, digits and
/// `. _ + -`; domain labels take letters, digits and hyphens; the TLD is
/// alphabetic and at least two characters long.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._+\-]+@(?:[A-Za-z0-9\-]+\.)+[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Normalize an email for uniqueness checks and lookup.
///
/// The display value keeps the casing the user typed; only comparisons use
/// this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check an email address against the accepted grammar.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}
