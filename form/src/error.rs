use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{INVALID_FORM_MESSAGE, INVALID_SCHEMA_MESSAGE, UNPARSABLE_FORM_MESSAGE};
use crate::rule::RuleSyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// One or more fields failed validation.
    #[default]
    Einvalid,
    /// The raw body could not be parsed as form data.
    Ebadrequest,
    /// The record schema itself is broken.
    Einternal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Einvalid => write!(f, "invalid"),
            Self::Ebadrequest => write!(f, "bad_request"),
            Self::Einternal => write!(f, "internal"),
        }
    }
}

/// Why a single field was rejected. `Display` yields the message sent back
/// to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    Required,
    TooShort { min: usize },
    InvalidEmail,
    NotANumber,
    NotABoolean,
    NotUtc,
    NotCommaSeparatedNumbers,
    NotNumbers,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::TooShort { min } => write!(f, "must be at least {min} chars long"),
            Self::InvalidEmail => write!(f, "not valid"),
            Self::NotANumber => write!(f, "must be a number"),
            Self::NotABoolean => write!(f, "must be true or false"),
            Self::NotUtc => write!(f, "must be UTC"),
            Self::NotCommaSeparatedNumbers => write!(f, "must be comma separated numbers"),
            Self::NotNumbers => write!(f, "must be numbers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownViolation(pub String);

impl fmt::Display for UnknownViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field message: {}", self.0)
    }
}

impl std::error::Error for UnknownViolation {}

impl FromStr for Violation {
    type Err = UnknownViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Self::Required),
            "not valid" => Ok(Self::InvalidEmail),
            "must be a number" => Ok(Self::NotANumber),
            "must be true or false" => Ok(Self::NotABoolean),
            "must be UTC" => Ok(Self::NotUtc),
            "must be comma separated numbers" => Ok(Self::NotCommaSeparatedNumbers),
            "must be numbers" => Ok(Self::NotNumbers),
            other => other
                .strip_prefix("must be at least ")
                .and_then(|rest| rest.strip_suffix(" chars long"))
                .and_then(|n| n.parse::<usize>().ok())
                .map(|min| Self::TooShort { min })
                .ok_or_else(|| UnknownViolation(other.to_string())),
        }
    }
}

impl Serialize for Violation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Violation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ViolationVisitor;

        impl Visitor<'_> for ViolationVisitor {
            type Value = Violation;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a field validation message")
            }

            fn visit_str<E>(self, value: &str) -> Result<Violation, E>
            where
                E: de::Error,
            {
                value.parse().map_err(|e: UnknownViolation| E::custom(e))
            }
        }

        deserializer.deserialize_str(ViolationVisitor)
    }
}

/// Field-keyed validation failures, keyed by source name.
///
/// Holds one message per field: recording a second violation for the same
/// name replaces the first (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Violation>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `violation` for `field`, returning the one it replaced.
    pub fn insert(&mut self, field: &str, violation: Violation) -> Option<Violation> {
        self.0.insert(field.to_string(), violation)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<Violation> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Violation)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a String, &'a Violation);
    type IntoIter = btree_map::Iter<'a, String, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Body sent back when a decode cannot be used: a fixed message plus the
/// per-field report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub code: ErrorCode,
    pub message: String,
    pub fields: FieldErrors,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ErrorResponse {
    #[must_use]
    pub fn new(code: ErrorCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            fields: FieldErrors::new(),
        }
    }

    #[must_use]
    pub fn invalid(fields: FieldErrors) -> Self {
        Self {
            fields,
            ..Self::new(ErrorCode::Einvalid, INVALID_FORM_MESSAGE)
        }
    }

    #[must_use]
    pub fn unparsable() -> Self {
        Self::new(ErrorCode::Ebadrequest, UNPARSABLE_FORM_MESSAGE)
    }

    #[must_use]
    pub fn invalid_schema() -> Self {
        Self::new(ErrorCode::Einternal, INVALID_SCHEMA_MESSAGE)
    }

    pub fn add_field(&mut self, field: &str, violation: Violation) {
        self.fields.insert(field, violation);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// A programmer mistake in a record's schema. Aborts the whole decode and is
/// never mixed into the field report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("field `{field}`: {source}")]
    Rule {
        field: &'static str,
        #[source]
        source: RuleSyntaxError,
    },
    #[error("field `{field}`: rule does not name a source key")]
    MissingSourceName { field: &'static str },
}
