use chrono::{DateTime, Utc};

use crate::kind::{FieldValue, Kind};

/// Typed handle to one destination field of `T`. The variant fixes the
/// field's semantic kind, so a descriptor cannot disagree with the field it
/// writes to.
pub enum Slot<T> {
    Text(fn(&mut T) -> &mut String),
    Int64(fn(&mut T) -> &mut i64),
    Float32(fn(&mut T) -> &mut f32),
    Bool(fn(&mut T) -> &mut bool),
    Timestamp(fn(&mut T) -> &mut DateTime<Utc>),
    OptionalTimestamp(fn(&mut T) -> &mut Option<DateTime<Utc>>),
    Int64List(fn(&mut T) -> &mut Vec<i64>),
    TextList(fn(&mut T) -> &mut Vec<String>),
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> Slot<T> {
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Text(_) => Kind::Text,
            Self::Int64(_) => Kind::Int64,
            Self::Float32(_) => Kind::Float32,
            Self::Bool(_) => Kind::Bool,
            Self::Timestamp(_) => Kind::Timestamp,
            Self::OptionalTimestamp(_) => Kind::OptionalTimestamp,
            Self::Int64List(_) => Kind::Int64List,
            Self::TextList(_) => Kind::TextList,
        }
    }

    /// Stores `value` into the field. Hands the value back when its kind
    /// does not match the slot.
    pub fn assign(&self, record: &mut T, value: FieldValue) -> Result<(), FieldValue> {
        match (self, value) {
            (Self::Text(field), FieldValue::Text(v)) => *field(record) = v,
            (Self::Int64(field), FieldValue::Int64(v)) => *field(record) = v,
            (Self::Float32(field), FieldValue::Float32(v)) => *field(record) = v,
            (Self::Bool(field), FieldValue::Bool(v)) => *field(record) = v,
            (Self::Timestamp(field), FieldValue::Timestamp(v)) => *field(record) = v,
            (Self::OptionalTimestamp(field), FieldValue::OptionalTimestamp(v)) => {
                *field(record) = v;
            }
            (Self::Int64List(field), FieldValue::Int64List(v)) => *field(record) = v,
            (Self::TextList(field), FieldValue::TextList(v)) => *field(record) = v,
            (_, other) => return Err(other),
        }
        Ok(())
    }
}

/// One declared field: its name in the record, how to reach it and the rule
/// spec that drives its decoding.
pub struct Field<T> {
    pub name: &'static str,
    pub rule: &'static str,
    pub slot: Slot<T>,
}

impl<T> Field<T> {
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.slot.kind()
    }
}

/// Ordered list of a record's declared fields.
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> Schema<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, rule: &'static str, slot: Slot<T>) -> Self {
        self.fields.push(Field { name, rule, slot });
        self
    }

    #[must_use]
    pub fn text(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut String,
    ) -> Self {
        self.field(name, rule, Slot::Text(f))
    }

    #[must_use]
    pub fn int64(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut i64,
    ) -> Self {
        self.field(name, rule, Slot::Int64(f))
    }

    #[must_use]
    pub fn float32(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut f32,
    ) -> Self {
        self.field(name, rule, Slot::Float32(f))
    }

    #[must_use]
    pub fn boolean(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut bool,
    ) -> Self {
        self.field(name, rule, Slot::Bool(f))
    }

    #[must_use]
    pub fn timestamp(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut DateTime<Utc>,
    ) -> Self {
        self.field(name, rule, Slot::Timestamp(f))
    }

    #[must_use]
    pub fn optional_timestamp(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut Option<DateTime<Utc>>,
    ) -> Self {
        self.field(name, rule, Slot::OptionalTimestamp(f))
    }

    #[must_use]
    pub fn int64_list(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut Vec<i64>,
    ) -> Self {
        self.field(name, rule, Slot::Int64List(f))
    }

    #[must_use]
    pub fn text_list(
        self,
        name: &'static str,
        rule: &'static str,
        f: fn(&mut T) -> &mut Vec<String>,
    ) -> Self {
        self.field(name, rule, Slot::TextList(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<T>> {
        self.fields.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record that can be filled from form data.
///
/// ```
/// use form::{FormSchema, Schema};
///
/// #[derive(Default)]
/// struct Login {
///     email: String,
///     password: String,
/// }
///
/// impl FormSchema for Login {
///     fn schema() -> Schema<Self> {
///         Schema::<Self>::new()
///             .text("email", "as:email,email,required", |l| &mut l.email)
///             .text("password", "as:password,min:8,required", |l| &mut l.password)
///     }
/// }
/// ```
pub trait FormSchema: Default {
    fn schema() -> Schema<Self>;
}
