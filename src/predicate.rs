//! Compiled predicates.
//!
//! A [`Predicate`] is the output of compiling filter clauses: comparisons on
//! resolved attributes with coerced operands, negations of those, and binary
//! conjunctions. Predicates can be evaluated directly against anything that
//! implements [`Record`], or handed to a queryable collection that translates
//! them for its own storage.
//!
//! Evaluation follows SQL's three-valued logic so that in-memory and SQL
//! backed collections agree: a comparison involving a missing value (or a
//! missing related record) is unknown, negating unknown stays unknown, and
//! only predicates that come out as true select a record.

use std::cmp::Ordering;
use std::fmt;
use std::ops;

use crate::comparator::ComparatorKind;
use crate::schema::ResolvedAttribute;
use crate::value::Value;

// ------------- Records -------------
/// What a record holds under an attribute name.
pub enum Field<'a> {
    Value(Value),
    Related(&'a dyn Record),
}
impl From<Value> for Field<'_> {
    fn from(value: Value) -> Self {
        Field::Value(value)
    }
}

/// Read access to an entity's attributes by name. Missing and null attributes
/// are both reported as `None`.
pub trait Record {
    fn field(&self, name: &str) -> Option<Field<'_>>;
}

fn lookup(record: &dyn Record, attribute: &ResolvedAttribute) -> Option<Value> {
    let mut current = record;
    for step in &attribute.joins {
        match current.field(step.attribute)? {
            Field::Related(next) => current = next,
            Field::Value(_) => return None,
        }
    }
    match current.field(attribute.name)? {
        Field::Value(value) => Some(value),
        Field::Related(_) => None,
    }
}

// ------------- Predicate -------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Compare {
        attribute: ResolvedAttribute,
        kind: ComparatorKind,
        value: Value,
    },
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// The operands of the AND chain, left to right.
    pub fn conjuncts(&self) -> Vec<&Predicate> {
        match self {
            Predicate::And(left, right) => {
                let mut conjuncts = left.conjuncts();
                conjuncts.extend(right.conjuncts());
                conjuncts
            }
            other => vec![other],
        }
    }

    /// Every attribute referenced, in order of appearance.
    pub fn attributes(&self) -> Vec<&ResolvedAttribute> {
        match self {
            Predicate::Compare { attribute, .. } => vec![attribute],
            Predicate::Not(inner) => inner.attributes(),
            Predicate::And(left, right) => {
                let mut attributes = left.attributes();
                attributes.extend(right.attributes());
                attributes
            }
        }
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        self.evaluate(record) == Some(true)
    }

    /// `None` stands for unknown.
    pub fn evaluate(&self, record: &dyn Record) -> Option<bool> {
        match self {
            Predicate::Compare { attribute, kind, value } => {
                let actual = lookup(record, attribute)?;
                compare(&actual, *kind, value)
            }
            Predicate::Not(inner) => inner.evaluate(record).map(|b| !b),
            Predicate::And(left, right) => match (left.evaluate(record), right.evaluate(record)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
        }
    }
}

fn compare(actual: &Value, kind: ComparatorKind, expected: &Value) -> Option<bool> {
    match kind {
        ComparatorKind::Equal => actual.compare(expected).map(Ordering::is_eq),
        ComparatorKind::NotEqual => actual.compare(expected).map(Ordering::is_ne),
        ComparatorKind::GreaterThan => actual.compare(expected).map(Ordering::is_gt),
        ComparatorKind::LessThan => actual.compare(expected).map(Ordering::is_lt),
        ComparatorKind::GreaterOrEqual => actual.compare(expected).map(Ordering::is_ge),
        ComparatorKind::LessOrEqual => actual.compare(expected).map(Ordering::is_le),
        ComparatorKind::Like => match expected {
            Value::Pattern(pattern) => actual.as_text().map(|text| pattern.is_match(text)),
            _ => None,
        },
        ComparatorKind::In => match expected {
            Value::List(items) => Some(items.iter().any(|item| actual.compare(item) == Some(Ordering::Equal))),
            single => actual.compare(single).map(Ordering::is_eq),
        },
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;
    fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}
impl ops::BitAnd for Predicate {
    type Output = Predicate;
    fn bitand(self, other: Predicate) -> Predicate {
        self.and(other)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Predicate::Compare { attribute, kind, value } => {
                write!(f, "{} {} {}", attribute.path, kind, value)
            }
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
            Predicate::And(left, right) => write!(f, "{} AND {}", left, right),
        }
    }
}
