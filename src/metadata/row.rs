//! Catalog result rows.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{SourceError, SourceResult};
use crate::model::Flag;

/// A single catalog field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// One row of a catalog query: ordered, labelled fields.
///
/// Label lookup is ASCII case-insensitive, since drivers disagree on the
/// case of standard labels. Accessors mirror the usual result-set getters,
/// except that an absent or NULL field is `None` rather than a zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    fields: Vec<(String, Value)>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any field with the same label.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(label, value);
        self
    }

    /// Set a field, replacing any field with the same label.
    pub fn set(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        let label = label.into();
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|(l, _)| l.eq_ignore_ascii_case(&label))
        {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((label, value)),
        }
    }

    /// Raw value for `label`; NULL fields are `None`.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, v)| v)
            .filter(|v| **v != Value::Null)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field as text. Integers are rendered in decimal.
    pub fn get_str(&self, label: &str) -> Option<String> {
        match self.get(label)? {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Null => None,
        }
    }

    /// Field as text, failing with [`SourceError::MissingField`] when absent.
    pub fn require_str(&self, label: &str) -> SourceResult<String> {
        self.get_str(label)
            .ok_or_else(|| SourceError::MissingField(label.to_string()))
    }

    /// Field as an integer. Text is parsed after trimming.
    pub fn get_i64(&self, label: &str) -> SourceResult<Option<i64>> {
        match self.get(label) {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i)),
            Some(Value::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::Text(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid(label, s)),
            Some(Value::Null) => Ok(None),
        }
    }

    pub fn get_i32(&self, label: &str) -> SourceResult<Option<i32>> {
        self.get_i64(label)?
            .map(|i| i32::try_from(i).map_err(|_| invalid(label, &i.to_string())))
            .transpose()
    }

    pub fn get_i16(&self, label: &str) -> SourceResult<Option<i16>> {
        self.get_i64(label)?
            .map(|i| i16::try_from(i).map_err(|_| invalid(label, &i.to_string())))
            .transpose()
    }

    /// Field as a tri-state flag.
    pub fn get_flag(&self, label: &str) -> Flag {
        match self.get(label) {
            Some(Value::Integer(1)) => Flag::Yes,
            Some(Value::Integer(0)) => Flag::No,
            Some(Value::Text(s)) => Flag::from_catalog(Some(s.as_str())),
            _ => Flag::Unknown,
        }
    }
}

fn invalid(label: &str, value: &str) -> SourceError {
    SourceError::InvalidField {
        field: label.to_string(),
        value: value.to_string(),
    }
}
