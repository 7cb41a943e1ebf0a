//! Field-by-field validation of untyped JSON into the record model.
//!
//! Validation never stops at the first problem: every [`FromRaw`] implementation records what it
//! finds wrong in a shared [`Violations`] list and carries on, so a single pass reports every
//! missing, mistyped, or invalid nested field. Serialization is plain `serde::Serialize`.

use std::{collections::BTreeMap, fmt};

use serde_json::{Map, Value};

use crate::{
    alias::to_dash,
    error::{SchemaValidationError, Violation, ViolationKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Where in the raw input a value lives, e.g. `author.0.given`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loc(Vec<Segment>);

impl Loc {
    pub fn key(&self, key: &str) -> Loc {
        let mut next = self.clone();
        next.0.push(Segment::Key(key.to_owned()));
        next
    }

    pub fn index(&self, i: usize) -> Loc {
        let mut next = self.clone();
        next.0.push(Segment::Index(i));
        next
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match seg {
                Segment::Key(k) => f.write_str(k)?,
                Segment::Index(n) => write!(f, "{n}")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn push(&mut self, loc: Loc, kind: ViolationKind) {
        self.0.push(Violation { loc, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_error(self, model: &'static str) -> SchemaValidationError {
        SchemaValidationError {
            model,
            violations: self.0,
        }
    }
}

/// Build `Self` from an untyped value. Returns `None` if anything under `loc` was rejected, in
/// which case at least one violation has been recorded.
pub trait FromRaw: Sized {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self>;
}

/// Validate a whole document rooted at `value`.
pub fn validate<T: FromRaw>(
    value: &Value,
    model: &'static str,
) -> Result<T, SchemaValidationError> {
    let mut violations = Violations::default();
    let parsed = T::from_raw(value, &Loc::default(), &mut violations);
    match parsed {
        Some(v) if violations.is_empty() => Ok(v),
        _ => Err(violations.into_error(model)),
    }
}

impl FromRaw for String {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => {
                violations.push(loc.clone(), ViolationKind::Type("string"));
                None
            }
        }
    }
}

impl FromRaw for i64 {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let n = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        if n.is_none() {
            violations.push(loc.clone(), ViolationKind::Type("integer"));
        }
        n
    }
}

impl FromRaw for bool {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => {
                violations.push(loc.clone(), ViolationKind::Type("boolean"));
                None
            }
        }
    }
}

impl<T: FromRaw> FromRaw for Vec<T> {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let Value::Array(items) = value else {
            violations.push(loc.clone(), ViolationKind::Type("list"));
            return None;
        };
        // Visit every element so each bad one is reported.
        let parsed: Vec<Option<T>> = items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_raw(item, &loc.index(i), violations))
            .collect();
        parsed.into_iter().collect()
    }
}

impl<T: FromRaw> FromRaw for BTreeMap<String, T> {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let Value::Object(map) = value else {
            violations.push(loc.clone(), ViolationKind::Type("dictionary"));
            return None;
        };
        let parsed: Vec<Option<(String, T)>> = map
            .iter()
            .map(|(k, v)| T::from_raw(v, &loc.key(k), violations).map(|v| (k.clone(), v)))
            .collect();
        parsed.into_iter().collect()
    }
}

impl FromRaw for Map<String, Value> {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map.clone()),
            _ => {
                violations.push(loc.clone(), ViolationKind::Type("dictionary"));
                None
            }
        }
    }
}

/// Reads the named fields of one JSON object.
///
/// Field names are given in the underscored convention and read from the raw key [`to_dash`]
/// gives for them. The underscored spelling of a raw key is not accepted.
pub struct Fields<'v, 'e> {
    map: &'v Map<String, Value>,
    loc: Loc,
    violations: &'e mut Violations,
}

impl<'v, 'e> Fields<'v, 'e> {
    pub fn open(value: &'v Value, loc: &Loc, violations: &'e mut Violations) -> Option<Self> {
        let Value::Object(map) = value else {
            violations.push(loc.clone(), ViolationKind::Type("dictionary"));
            return None;
        };
        Some(Fields {
            map,
            loc: loc.clone(),
            violations,
        })
    }

    fn lookup(&self, field: &str) -> Option<&'v Value> {
        self.map.get(&to_dash(field))
    }

    pub fn loc(&self, field: &str) -> Loc {
        self.loc.key(&to_dash(field))
    }

    pub fn violations(&mut self) -> &mut Violations {
        &mut *self.violations
    }

    pub fn required<T: FromRaw>(&mut self, field: &str) -> Option<T> {
        let loc = self.loc(field);
        match self.lookup(field) {
            Some(v) => T::from_raw(v, &loc, self.violations),
            None => {
                self.violations.push(loc, ViolationKind::Missing);
                None
            }
        }
    }

    /// A required string that must not be empty.
    pub fn required_text(&mut self, field: &str) -> Option<String> {
        let s: String = self.required(field)?;
        if s.is_empty() {
            let loc = self.loc(field);
            self.violations.push(loc, ViolationKind::EmptyString);
            return None;
        }
        Some(s)
    }

    /// Absent and `null` are both `None`; a present but invalid value is recorded and also `None`.
    pub fn optional<T: FromRaw>(&mut self, field: &str) -> Option<T> {
        let loc = self.loc(field);
        match self.lookup(field) {
            None | Some(Value::Null) => None,
            Some(v) => T::from_raw(v, &loc, self.violations),
        }
    }
}
