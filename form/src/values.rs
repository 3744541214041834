use std::collections::HashMap;

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedForm {
    #[error("form data is not valid UTF-8")]
    InvalidUtf8,
    #[error("invalid percent escape at byte {offset}")]
    InvalidEscape { offset: usize },
}

/// Raw submitted form: every key maps to its values in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(HashMap<String, Vec<String>>);

impl FormValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value under `key`.
    pub fn set<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// Values under `key`. A key submitted with no values counts as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0
            .get(key)
            .map(Vec::as_slice)
            .filter(|values| !values.is_empty())
    }

    /// Appends every value of `other` after the ones already held.
    pub fn merge(&mut self, other: Self) {
        for (key, values) in other.0 {
            self.0.entry(key).or_default().extend(values);
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses `application/x-www-form-urlencoded` data.
    ///
    /// Rejects non UTF-8 input and `%` not followed by two hex digits; the
    /// url crate would otherwise decode those lossily.
    pub fn parse_urlencoded(input: &[u8]) -> Result<Self, MalformedForm> {
        let text = std::str::from_utf8(input).map_err(|_| MalformedForm::InvalidUtf8)?;
        check_escapes(text)?;

        let mut values = Self::new();
        for (key, value) in form_urlencoded::parse(text.as_bytes()) {
            values.append(key, value);
        }
        Ok(values)
    }
}

fn check_escapes(text: &str) -> Result<(), MalformedForm> {
    let bytes = text.as_bytes();
    for (offset, _) in text.match_indices('%') {
        let escape = offset
            .checked_add(1)
            .zip(offset.checked_add(3))
            .and_then(|(start, end)| bytes.get(start..end));
        match escape {
            Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => {}
            _ => return Err(MalformedForm::InvalidEscape { offset }),
        }
    }
    Ok(())
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.append(key, value);
        }
        values
    }
}

impl From<HashMap<String, Vec<String>>> for FormValues {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

/// Where a decode gets its raw mapping from.
pub trait FormSource {
    fn form_values(&self) -> Result<FormValues, MalformedForm>;
}

impl FormSource for FormValues {
    fn form_values(&self) -> Result<FormValues, MalformedForm> {
        Ok(self.clone())
    }
}

/// Url-encoded bytes, as found in a request body or query string.
#[derive(Debug, Clone, Copy)]
pub struct UrlEncoded<'a>(pub &'a [u8]);

impl FormSource for UrlEncoded<'_> {
    fn form_values(&self) -> Result<FormValues, MalformedForm> {
        FormValues::parse_urlencoded(self.0)
    }
}
