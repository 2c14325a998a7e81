// Record predicates and the listing filter builder
// Author: Gabriel Demetrios Lafis

use std::ops::Bound;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::{Record, Value};

/// Value used by the dashboard to mean "no constraint" on a categorical filter
pub const ALL_SENTINEL: &str = "All";

/// Boolean condition over a record.
///
/// Kept as plain data so a store backend can translate it into its own
/// query language; `matches` is the reference evaluation used by the
/// in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// No constraint
    Any,
    /// Record id equals a value
    Id(String),
    /// Field at a dotted path equals a value
    Eq { field: String, value: Value },
    /// Creation timestamp within bounds
    CreatedAt {
        start: Bound<DateTime<Utc>>,
        end: Bound<DateTime<Utc>>,
    },
    /// Array field length within inclusive bounds
    ArrayLen {
        field: String,
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Every inner predicate holds
    And(Vec<Predicate>),
}

impl Predicate {
    /// Equality on a field
    pub fn eq<F: Into<String>, V: Into<Value>>(field: F, value: V) -> Self {
        Predicate::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Half-open creation window `[start, end)`
    pub fn created_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Predicate::CreatedAt {
            start: Bound::Included(start),
            end: Bound::Excluded(end),
        }
    }

    /// Conjunction of two predicates, flattening nested `And` and dropping `Any`
    pub fn and(self, other: Predicate) -> Self {
        let mut parts = Vec::new();

        for p in [self, other] {
            match p {
                Predicate::Any => {}
                Predicate::And(inner) => parts.extend(inner),
                p => parts.push(p),
            }
        }

        match parts.len() {
            0 => Predicate::Any,
            1 => parts.remove(0),
            _ => Predicate::And(parts),
        }
    }

    /// Check whether the predicate holds for a record
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Id(id) => record.id == *id,
            Predicate::Eq { field, value } => record.get(field).map_or(false, |v| v == value),
            Predicate::CreatedAt { start, end } => {
                let ts = record.created_at;
                let after_start = match start {
                    Bound::Included(s) => ts >= *s,
                    Bound::Excluded(s) => ts > *s,
                    Bound::Unbounded => true,
                };
                let before_end = match end {
                    Bound::Included(e) => ts <= *e,
                    Bound::Excluded(e) => ts < *e,
                    Bound::Unbounded => true,
                };
                after_start && before_end
            }
            Predicate::ArrayLen { field, min, max } => {
                let len = match record.get(field) {
                    Some(Value::Array(items)) => items.len(),
                    _ => 0,
                };
                min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
            }
            Predicate::And(parts) => parts.iter().all(|p| p.matches(record)),
        }
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::Any
    }
}

/// Composes optional listing filters into a single predicate.
///
/// Absent values, empty strings and the `"All"` sentinel impose no
/// constraint.
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    predicate: Predicate,
}

impl PredicateBuilder {
    /// Start from an unconstrained predicate
    pub fn new() -> Self {
        PredicateBuilder::default()
    }

    /// Start from a base predicate that always applies
    pub fn with_base(base: Predicate) -> Self {
        PredicateBuilder { predicate: base }
    }

    /// Constrain a field to equal a value when one is supplied
    pub fn eq(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.map(str::trim) {
            if !v.is_empty() && v != ALL_SENTINEL {
                self.predicate = self.predicate.and(Predicate::eq(field, v));
            }
        }
        self
    }

    /// Constrain creation to a calendar day, 00:00:00 to 23:59:59 inclusive
    pub fn created_on(mut self, day: Option<NaiveDate>) -> Self {
        if let Some(day) = day {
            let start = day.and_hms_opt(0, 0, 0).map(|t| Utc.from_utc_datetime(&t));
            let end = day.and_hms_opt(23, 59, 59).map(|t| Utc.from_utc_datetime(&t));

            if let (Some(start), Some(end)) = (start, end) {
                self.predicate = self.predicate.and(Predicate::CreatedAt {
                    start: Bound::Included(start),
                    end: Bound::Included(end),
                });
            }
        }
        self
    }

    /// Constrain an array field's length to an inclusive range
    pub fn array_len(mut self, field: &str, min: Option<usize>, max: Option<usize>) -> Self {
        if min.is_some() || max.is_some() {
            self.predicate = self.predicate.and(Predicate::ArrayLen {
                field: field.to_string(),
                min,
                max,
            });
        }
        self
    }

    /// Add an arbitrary predicate
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicate = self.predicate.and(predicate);
        self
    }

    pub fn build(self) -> Predicate {
        self.predicate
    }
}
