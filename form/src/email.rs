use std::sync::LazyLock;

use regex::Regex;

/// Decides whether a text field flagged `email` holds an address.
pub trait EmailValidator {
    fn is_valid_email(&self, candidate: &str) -> bool;
}

impl<F> EmailValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_email(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

// Local part in the dot-atom form, domain made of DNS labels with a
// top-level label of at least two letters.
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .ok()
});

const MAX_EMAIL_LENGTH: usize = 254;

/// Syntax-only check, no DNS lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxEmailValidator;

impl EmailValidator for SyntaxEmailValidator {
    fn is_valid_email(&self, candidate: &str) -> bool {
        if candidate.len() > MAX_EMAIL_LENGTH {
            return false;
        }
        EMAIL_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(candidate))
    }
}
