//! Decoding of flat key/value form data into typed records.
//!
//! Each record publishes a [`Schema`]: an ordered list of fields, each with a
//! typed accessor and a rule spec such as `as:password,min:6,required`.
//! Decoding visits every field, converts the submitted strings and collects
//! failures into a [`FieldErrors`] map keyed by source name instead of
//! stopping at the first bad field.

pub mod constants;
pub mod convert;
pub mod email;
pub mod error;
pub mod kind;
pub mod rule;
pub mod scalar;
pub mod schema;
pub mod session;
pub mod values;
pub mod walker;

pub use constants::*;
pub use convert::{Conversion, convert};
pub use email::{EmailValidator, SyntaxEmailValidator};
pub use error::{ConfigError, ErrorCode, ErrorResponse, FieldErrors, Violation};
pub use kind::{FieldValue, Kind};
pub use rule::{FieldRule, RuleSyntaxError};
pub use schema::{Field, FormSchema, Schema, Slot};
pub use session::{ApplyError, Decoder, Session, decode};
pub use values::{FormSource, FormValues, MalformedForm, UrlEncoded};
pub use walker::{DecodeResult, walk};
