use std::fmt;

use chrono::{DateTime, Utc};

/// The closed set of destination types a form field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Int64,
    Float32,
    Bool,
    Timestamp,
    OptionalTimestamp,
    Int64List,
    TextList,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Int64 => write!(f, "i64"),
            Self::Float32 => write!(f, "f32"),
            Self::Bool => write!(f, "bool"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::OptionalTimestamp => write!(f, "optional timestamp"),
            Self::Int64List => write!(f, "list of i64"),
            Self::TextList => write!(f, "list of text"),
        }
    }
}

/// A converted value, ready to be stored in its destination field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int64(i64),
    Float32(f32),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    OptionalTimestamp(Option<DateTime<Utc>>),
    Int64List(Vec<i64>),
    TextList(Vec<String>),
}

impl FieldValue {
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
}

/// Value a timestamp destination holds when nothing valid was assigned.
#[must_use]
pub fn zero_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}
