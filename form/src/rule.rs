use std::str::FromStr;

use crate::constants::{
    RULE_AS, RULE_COMMA, RULE_EMAIL, RULE_KEY_SEPARATOR, RULE_MIN, RULE_REQUIRED, RULE_SEPARATOR,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSyntaxError {
    #[error("unknown rule: `{0}`")]
    Unknown(String),
    #[error("invalid min length in `{0}`: expected a non-negative integer")]
    InvalidMin(String),
    #[error("rule `{0}` does not take a value")]
    UnexpectedValue(String),
    #[error("rule `as` needs a source name")]
    EmptySourceName,
}

/// Parsed form of a rule spec such as `as:password,min:6,required`.
///
/// A `min_length` of zero means no minimum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRule {
    pub source_name: String,
    pub required: bool,
    pub min_length: usize,
    pub must_be_email: bool,
    pub comma_separated: bool,
}

impl FieldRule {
    /// Parses a comma separated rule spec. Later tokens overwrite earlier
    /// ones for the same key; empty tokens are skipped.
    pub fn parse(spec: &str) -> Result<Self, RuleSyntaxError> {
        let mut rule = Self::default();

        for token in spec.split(RULE_SEPARATOR).map(str::trim) {
            if token.is_empty() {
                continue;
            }

            let (key, value) = match token.split_once(RULE_KEY_SEPARATOR) {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (token, None),
            };

            match (key, value) {
                (RULE_AS, Some(name)) if !name.is_empty() => {
                    rule.source_name = name.to_string();
                }
                (RULE_AS, _) => return Err(RuleSyntaxError::EmptySourceName),
                (RULE_MIN, Some(n)) => {
                    rule.min_length = n
                        .parse()
                        .map_err(|_| RuleSyntaxError::InvalidMin(token.to_string()))?;
                }
                (RULE_MIN, None) => return Err(RuleSyntaxError::InvalidMin(token.to_string())),
                (RULE_REQUIRED, None) => rule.required = true,
                (RULE_EMAIL, None) => rule.must_be_email = true,
                (RULE_COMMA, None) => rule.comma_separated = true,
                (RULE_REQUIRED | RULE_EMAIL | RULE_COMMA, Some(_)) => {
                    return Err(RuleSyntaxError::UnexpectedValue(token.to_string()));
                }
                _ => return Err(RuleSyntaxError::Unknown(token.to_string())),
            }
        }

        Ok(rule)
    }
}

impl FromStr for FieldRule {
    type Err = RuleSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
