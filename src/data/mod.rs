// Data module for records, field values and predicates
// Author: Gabriel Demetrios Lafis

mod json;
mod predicate;

pub use json::*;
pub use predicate::*;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a stored domain record (patient, specialist, appointment, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, flatten)]
    pub fields: HashMap<String, Value>,
}

impl Record {
    /// Create a new record without fields
    pub fn new<S: Into<String>>(id: S, created_at: DateTime<Utc>) -> Self {
        Record {
            id: id.into(),
            created_at,
            fields: HashMap::new(),
        }
    }

    /// Set a top-level field, builder style
    pub fn with_field<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field addressed by a dotted path, creating intermediate maps
    pub fn with_path<V: Into<Value>>(mut self, path: &str, value: V) -> Self {
        self.set_path(path, value.into());
        self
    }

    /// Set a field addressed by a dotted path
    pub fn set_path(&mut self, path: &str, value: Value) {
        let mut parts = path.split('.').peekable();
        let mut current = &mut self.fields;

        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                current.insert(part.to_string(), value);
                return;
            }

            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Map(HashMap::new()));

            if !matches!(entry, Value::Map(_)) {
                *entry = Value::Map(HashMap::new());
            }

            current = match entry {
                Value::Map(map) => map,
                _ => return,
            };
        }
    }

    /// Remove a field addressed by a dotted path, returning it when present
    pub fn remove_path(&mut self, path: &str) -> Option<Value> {
        let (parents, last) = match path.rsplit_once('.') {
            Some((parents, last)) => (Some(parents), last),
            None => (None, path),
        };

        let mut current = &mut self.fields;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = match current.get_mut(part)? {
                Value::Map(map) => map,
                _ => return None,
            };
        }

        current.remove(last)
    }

    /// Drop every listed path, builder style
    pub fn without_paths(mut self, paths: &[&str]) -> Self {
        for path in paths {
            self.remove_path(path);
        }
        self
    }

    /// Look up a field by dotted path (`profile.gender`)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;

        for part in parts {
            current = match current {
                Value::Map(map) => map.get(part)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Look up a string field by dotted path
    pub fn get_str(&self, path: &str) -> Option<&str> {
        match self.get(path)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Represents a field value in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Render a scalar value as a grouping label
    pub fn as_label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Boolean(b) => Some(b.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Array(_) | Value::Map(_) => None,
        }
    }

    /// Collect every string fragment reachable from this value
    pub fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Value::String(s) => out.push(s),
            Value::Array(items) => items.iter().for_each(|v| v.collect_text(out)),
            Value::Map(map) => map.values().for_each(|v| v.collect_text(out)),
            _ => {}
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
