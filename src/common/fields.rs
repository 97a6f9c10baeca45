// src/common/fields.rs

use alloc::vec::Vec;

use super::error::CodecError;
use super::response::MeasurementValue;
use super::units;

/// Label lookup over the `label=value` tokens of a frame body.
///
/// Keeps the original token for each label, since unit resolution needs the
/// trailing unit character as well as the numeric part. Tokens stay in
/// arrival order; a repeated label replaces the earlier token in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> FieldMap<'a> {
    /// Builds the map from the tokens following the message tag.
    pub fn parse(tokens: &[&'a str]) -> Result<Self, CodecError> {
        let mut map = FieldMap { entries: Vec::with_capacity(tokens.len()) };
        for &token in tokens {
            let label = split_token(token)?.0;
            match map.entries.iter_mut().find(|(l, _)| *l == label) {
                Some(entry) => entry.1 = token,
                None => map.entries.push((label, token)),
            }
        }
        Ok(map)
    }

    /// Returns the full `label=value` token for `label`.
    pub fn token(&self, label: &str) -> Option<&'a str> {
        self.entries.iter().find(|(l, _)| *l == label).map(|(_, t)| *t)
    }

    /// Returns only the value part for `label`.
    pub fn value(&self, label: &str) -> Option<&'a str> {
        self.token(label).map(|t| &t[label.len() + 1..])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.token(label).is_some()
    }

    /// Iterates `(label, value)` pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.entries.iter().map(|(label, token)| (*label, &token[label.len() + 1..]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes `label` with unit resolution. Absent labels yield `None`.
    pub fn measurement(&self, label: &str) -> Result<Option<MeasurementValue>, CodecError> {
        match self.value(label) {
            Some(raw) => units::resolve(label, raw),
            None => Ok(None),
        }
    }
}

/// Splits a token on its single `=`.
pub fn split_token(token: &str) -> Result<(&str, &str), CodecError> {
    let mut parts = token.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(label), Some(value), None) if !label.is_empty() => Ok((label, value)),
        _ => Err(CodecError::malformed(token)),
    }
}
