use tracing::debug;

use crate::email::{EmailValidator, SyntaxEmailValidator};
use crate::error::{ConfigError, ErrorResponse, FieldErrors};
use crate::kind::Kind;
use crate::schema::FormSchema;
use crate::values::{FormSource, MalformedForm};
use crate::walker::{DecodeResult, walk};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("form body could not be parsed")]
    Unparsable,
    #[error("form has {0} invalid field(s)")]
    Invalid(usize),
    #[error("field `{field}` is {found} in the form but {expected} in the target")]
    KindMismatch {
        field: &'static str,
        expected: Kind,
        found: Kind,
    },
}

/// Decodes records, checking `email` fields with `E`.
#[derive(Debug, Clone, Default)]
pub struct Decoder<E = SyntaxEmailValidator> {
    email: E,
}

impl Decoder<SyntaxEmailValidator> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            email: SyntaxEmailValidator,
        }
    }
}

impl<E: EmailValidator> Decoder<E> {
    #[must_use]
    pub const fn with_email_validator(email: E) -> Self {
        Self { email }
    }

    /// Reads the raw form from `source` and walks `T`'s schema over it.
    ///
    /// A malformed body is not an error here: the session comes back marked
    /// unparsable, with no field visited. Only a broken schema fails.
    pub fn decode<T, S>(&self, source: &S) -> Result<Session<T>, ConfigError>
    where
        T: FormSchema,
        S: FormSource + ?Sized,
    {
        let mut record = T::default();

        let raw = match source.form_values() {
            Ok(raw) => raw,
            Err(malformed) => {
                debug!(error = %malformed, "unparsable form body");
                return Ok(Session {
                    record,
                    result: DecodeResult::default(),
                    malformed: Some(malformed),
                });
            }
        };

        let result = walk(&T::schema(), &raw, &mut record, &self.email)?;
        Ok(Session {
            record,
            result,
            malformed: None,
        })
    }
}

/// Decodes `T` from `source` with the default email check.
pub fn decode<T, S>(source: &S) -> Result<Session<T>, ConfigError>
where
    T: FormSchema,
    S: FormSource + ?Sized,
{
    Decoder::new().decode(source)
}

/// Result of one decode call. Read-only once returned.
///
/// When `has_errors` is true the populated record must not be trusted: a
/// rejected field keeps its default value.
#[derive(Debug)]
pub struct Session<T> {
    record: T,
    result: DecodeResult,
    malformed: Option<MalformedForm>,
}

impl<T: FormSchema> Session<T> {
    /// True when at least one field failed validation.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.result.has_errors()
    }

    /// True when the body could not be read as form data at all.
    #[must_use]
    pub const fn is_unparsable(&self) -> bool {
        self.malformed.is_some()
    }

    #[must_use]
    pub const fn malformed(&self) -> Option<&MalformedForm> {
        self.malformed.as_ref()
    }

    #[must_use]
    pub fn exists(&self, source_name: &str) -> bool {
        self.result.exists(source_name)
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        self.result.errors()
    }

    #[must_use]
    pub const fn result(&self) -> &DecodeResult {
        &self.result
    }

    #[must_use]
    pub const fn record(&self) -> &T {
        &self.record
    }

    /// The body to send back instead of using the record, if any.
    #[must_use]
    pub fn report(&self) -> Option<ErrorResponse> {
        if self.is_unparsable() {
            Some(ErrorResponse::unparsable())
        } else if self.has_errors() {
            Some(ErrorResponse::invalid(self.errors().clone()))
        } else {
            None
        }
    }

    /// The record when it is safe to use, the error report otherwise.
    pub fn into_result(self) -> Result<T, ErrorResponse> {
        match self.report() {
            Some(report) => Err(report),
            None => Ok(self.record),
        }
    }

    /// Copies every converted field into `target`, matching fields by their
    /// declared name. Fields `U` does not declare are skipped; a same-named
    /// field of another kind is an error and nothing is written.
    pub fn apply_to<U: FormSchema>(&self, target: &mut U) -> Result<usize, ApplyError> {
        if self.is_unparsable() {
            return Err(ApplyError::Unparsable);
        }
        if self.has_errors() {
            return Err(ApplyError::Invalid(self.errors().len()));
        }

        let schema = U::schema();
        let mut matched = Vec::new();
        for (name, value) in self.result.values() {
            let Some(field) = schema.get(name) else {
                continue;
            };
            if field.kind() != value.kind() {
                return Err(ApplyError::KindMismatch {
                    field: field.name,
                    expected: field.kind(),
                    found: value.kind(),
                });
            }
            matched.push((field, value));
        }

        let count = matched.len();
        for (field, value) in matched {
            field
                .slot
                .assign(target, value.clone())
                .map_err(|v| ApplyError::KindMismatch {
                    field: field.name,
                    expected: field.kind(),
                    found: v.kind(),
                })?;
        }
        debug!(fields = count, "form applied to target record");
        Ok(count)
    }
}
