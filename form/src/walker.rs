use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::convert::convert;
use crate::email::EmailValidator;
use crate::error::{ConfigError, FieldErrors};
use crate::kind::FieldValue;
use crate::rule::FieldRule;
use crate::schema::Schema;
use crate::values::FormValues;

/// What one walk learned about the submitted form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeResult {
    presence: HashMap<String, bool>,
    errors: FieldErrors,
    values: Vec<(&'static str, FieldValue)>,
}

impl DecodeResult {
    /// Whether `source_name` was submitted. Names no field looked at are
    /// reported as absent.
    #[must_use]
    pub fn exists(&self, source_name: &str) -> bool {
        self.presence.get(source_name).copied().unwrap_or(false)
    }

    /// `None` when no field reads `source_name`.
    #[must_use]
    pub fn presence(&self, source_name: &str) -> Option<bool> {
        self.presence.get(source_name).copied()
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Successfully converted values, by declared field name, in walk order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

/// Visits every declared field once, in order, filling `record`.
///
/// Validation failures are collected and never stop the walk. A broken rule
/// spec aborts it: that is a mistake in the schema, not in the input.
pub fn walk<T>(
    schema: &Schema<T>,
    raw: &FormValues,
    record: &mut T,
    email: &dyn EmailValidator,
) -> Result<DecodeResult, ConfigError> {
    let mut result = DecodeResult::default();

    for field in schema.iter() {
        let rule = FieldRule::parse(field.rule).map_err(|source| {
            warn!(field = field.name, rule = field.rule, error = %source, "invalid form rule");
            ConfigError::Rule {
                field: field.name,
                source,
            }
        })?;
        if rule.source_name.is_empty() {
            warn!(field = field.name, rule = field.rule, "form rule without source name");
            return Err(ConfigError::MissingSourceName { field: field.name });
        }

        let conversion = convert(&rule, field.kind(), raw, email);
        result
            .presence
            .insert(rule.source_name.clone(), conversion.present);

        if let Some(violation) = conversion.violation {
            trace!(field = field.name, source = %rule.source_name, %violation, "field rejected");
            result.errors.insert(&rule.source_name, violation);
        } else if let Some(value) = &conversion.value {
            result.values.push((field.name, value.clone()));
        }

        if let Some(value) = conversion.value
            && let Err(value) = field.slot.assign(record, value)
        {
            warn!(
                field = field.name,
                expected = %field.kind(),
                got = %value.kind(),
                "converted value does not fit its field"
            );
        }
    }

    debug!(
        fields = schema.len(),
        submitted = raw.len(),
        errors = result.errors.len(),
        "form walk complete"
    );
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::email::SyntaxEmailValidator;
    use crate::error::Violation;
    use crate::rule::RuleSyntaxError;

    #[derive(Debug, Default)]
    struct Signup {
        name: String,
        age: i64,
        ids: Vec<i64>,
        active: bool,
    }

    fn schema() -> Schema<Signup> {
        Schema::<Signup>::new()
            .text("name", "as:name,required", |s| &mut s.name)
            .int64("age", "as:age", |s| &mut s.age)
            .int64_list("ids", "as:ids,comma", |s| &mut s.ids)
            .boolean("active", "as:active", |s| &mut s.active)
    }

    fn raw(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_walk_fills_record() {
        let mut record = Signup::default();
        let result = walk(
            &schema(),
            &raw(&[("name", "ann"), ("age", "41"), ("ids", "1,2"), ("active", "true")]),
            &mut record,
            &SyntaxEmailValidator,
        )
        .unwrap();

        assert!(!result.has_errors());
        assert_eq!(record.name, "ann");
        assert_eq!(record.age, 41);
        assert_eq!(record.ids, vec![1, 2]);
        assert!(record.active);
        assert_eq!(result.values().count(), 4);
    }

    #[test]
    fn test_walk_visits_every_field_after_errors() {
        let mut record = Signup::default();
        let result = walk(
            &schema(),
            &raw(&[("age", "old"), ("ids", "1,x"), ("active", "false")]),
            &mut record,
            &SyntaxEmailValidator,
        )
        .unwrap();

        assert_eq!(result.errors().len(), 3);
        assert_eq!(result.errors().get("name"), Some(Violation::Required));
        assert_eq!(result.errors().get("age"), Some(Violation::NotANumber));
        assert_eq!(
            result.errors().get("ids"),
            Some(Violation::NotCommaSeparatedNumbers)
        );
        assert!(!record.active);
        assert!(result.exists("active"));
        assert_eq!(record.age, 0);
        assert!(record.ids.is_empty());
    }

    #[test]
    fn test_walk_records_presence() {
        let mut record = Signup::default();
        let result = walk(
            &schema(),
            &raw(&[("name", "x")]),
            &mut record,
            &SyntaxEmailValidator,
        )
        .unwrap();

        assert_eq!(result.presence("name"), Some(true));
        assert_eq!(result.presence("age"), Some(false));
        assert_eq!(result.presence("unknown"), None);
        assert!(result.exists("name"));
        assert!(!result.exists("age"));
        assert!(!result.exists("unknown"));
    }

    #[test]
    fn test_walk_aborts_on_bad_rule() {
        let schema = Schema::<Signup>::new()
            .text("name", "as:name", |s| &mut s.name)
            .int64("age", "as:age,positive", |s| &mut s.age);
        let mut record = Signup::default();
        let err = walk(&schema, &raw(&[]), &mut record, &SyntaxEmailValidator).unwrap_err();

        assert_eq!(
            err,
            ConfigError::Rule {
                field: "age",
                source: RuleSyntaxError::Unknown("positive".to_string()),
            }
        );
    }

    #[test]
    fn test_walk_rejects_rule_without_source() {
        let schema = Schema::<Signup>::new().text("name", "required", |s| &mut s.name);
        let mut record = Signup::default();
        let err = walk(&schema, &raw(&[]), &mut record, &SyntaxEmailValidator).unwrap_err();
        assert_eq!(err, ConfigError::MissingSourceName { field: "name" });
    }
}
