use crate::constants::LIST_SEPARATOR;
use crate::email::EmailValidator;
use crate::error::Violation;
use crate::kind::{FieldValue, Kind, zero_timestamp};
use crate::rule::FieldRule;
use crate::scalar::{parse_bool_strict, parse_f32, parse_i64_auto, parse_timestamp};
use crate::values::FormValues;

/// Outcome of converting one field.
///
/// `value` and `violation` are independent: a failed conversion normally
/// carries no value, but an optional timestamp still hands back an owned
/// zero instance. Whenever `violation` is set the value is unreliable.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub present: bool,
    pub value: Option<FieldValue>,
    pub violation: Option<Violation>,
}

impl Conversion {
    const fn absent(violation: Option<Violation>) -> Self {
        Self {
            present: false,
            value: None,
            violation,
        }
    }

    const fn converted(value: FieldValue) -> Self {
        Self {
            present: true,
            value: Some(value),
            violation: None,
        }
    }

    const fn rejected(violation: Violation) -> Self {
        Self {
            present: true,
            value: None,
            violation: Some(violation),
        }
    }

    fn from_result(result: Result<FieldValue, Violation>) -> Self {
        match result {
            Ok(value) => Self::converted(value),
            Err(violation) => Self::rejected(violation),
        }
    }
}

/// Converts the raw values named by `rule` into a value of `kind`.
///
/// Scalars only look at the first submitted value. This never touches any
/// state besides its arguments, so the same inputs always give the same
/// conversion.
pub fn convert(
    rule: &FieldRule,
    kind: Kind,
    raw: &FormValues,
    email: &dyn EmailValidator,
) -> Conversion {
    let Some(values) = raw.get(&rule.source_name) else {
        return Conversion::absent(rule.required.then_some(Violation::Required));
    };
    let Some(first) = values.first().map(String::as_str) else {
        return Conversion::absent(rule.required.then_some(Violation::Required));
    };

    match kind {
        Kind::Text => Conversion::from_result(convert_text(rule, first, email)),
        Kind::Int64 => Conversion::from_result(
            parse_i64_auto(first)
                .map(FieldValue::Int64)
                .ok_or(Violation::NotANumber),
        ),
        Kind::Float32 => Conversion::from_result(
            parse_f32(first)
                .map(FieldValue::Float32)
                .ok_or(Violation::NotANumber),
        ),
        Kind::Bool => Conversion::from_result(
            parse_bool_strict(first)
                .map(FieldValue::Bool)
                .ok_or(Violation::NotABoolean),
        ),
        Kind::Timestamp => Conversion::from_result(
            parse_timestamp(first)
                .map(FieldValue::Timestamp)
                .ok_or(Violation::NotUtc),
        ),
        Kind::OptionalTimestamp => match parse_timestamp(first) {
            Some(ts) => Conversion::converted(FieldValue::OptionalTimestamp(Some(ts))),
            None => Conversion {
                value: Some(FieldValue::OptionalTimestamp(Some(zero_timestamp()))),
                ..Conversion::rejected(Violation::NotUtc)
            },
        },
        Kind::Int64List => Conversion::from_result(convert_i64_list(rule, values)),
        Kind::TextList => Conversion::converted(FieldValue::TextList(values.to_vec())),
    }
}

fn convert_text(
    rule: &FieldRule,
    value: &str,
    email: &dyn EmailValidator,
) -> Result<FieldValue, Violation> {
    if rule.min_length > 0 && value.chars().count() < rule.min_length {
        return Err(Violation::TooShort {
            min: rule.min_length,
        });
    }
    if rule.must_be_email && !email.is_valid_email(value) {
        return Err(Violation::InvalidEmail);
    }
    Ok(FieldValue::Text(value.to_string()))
}

fn convert_i64_list(rule: &FieldRule, values: &[String]) -> Result<FieldValue, Violation> {
    if rule.comma_separated {
        let joined = values.first().map_or("", String::as_str);
        joined
            .split(LIST_SEPARATOR)
            .map(|piece| piece.trim_matches(' ').parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::Int64List)
            .map_err(|_| Violation::NotCommaSeparatedNumbers)
    } else {
        values
            .iter()
            .map(|value| value.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::Int64List)
            .map_err(|_| Violation::NotNumbers)
    }
}
