//! Operator tokens.
//!
//! A token carries the comparison kind and an optional leading negation
//! marker in one string, e.g. `>=`, `!=`, `!like` or `not in`. Classification
//! is a single anchored match against the operator grammar below, so nothing
//! downstream ever looks at the raw token again.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::error::{FilterError, Result};

lazy_static! {
    static ref OPERATOR: Regex = Regex::new(
        r"(?i)^\s*(?P<negation>!|not\s+)?(?P<marker>>=|<=|<>|=|:|>|<|~|@|eq|ne|gt|lt|ge|le|like|in)\s*$"
    )
    .unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparatorKind {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    /// Substring or pattern match on text.
    Like,
    /// Membership in a set.
    In,
}

impl ComparatorKind {
    fn from_marker(marker: &str) -> Option<Self> {
        let kind = match marker.to_ascii_lowercase().as_str() {
            "=" | ":" | "eq" => ComparatorKind::Equal,
            "<>" | "ne" => ComparatorKind::NotEqual,
            ">" | "gt" => ComparatorKind::GreaterThan,
            "<" | "lt" => ComparatorKind::LessThan,
            ">=" | "ge" => ComparatorKind::GreaterOrEqual,
            "<=" | "le" => ComparatorKind::LessOrEqual,
            "~" | "like" => ComparatorKind::Like,
            "@" | "in" => ComparatorKind::In,
            _ => return None,
        };
        Some(kind)
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparatorKind::Equal => "=",
            ComparatorKind::NotEqual => "!=",
            ComparatorKind::GreaterThan => ">",
            ComparatorKind::LessThan => "<",
            ComparatorKind::GreaterOrEqual => ">=",
            ComparatorKind::LessOrEqual => "<=",
            ComparatorKind::Like => "LIKE",
            ComparatorKind::In => "IN",
        }
    }
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparatorKind::GreaterThan
                | ComparatorKind::LessThan
                | ComparatorKind::GreaterOrEqual
                | ComparatorKind::LessOrEqual
        )
    }
}
impl fmt::Display for ComparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Comparator {
    pub kind: ComparatorKind,
    pub negated: bool,
}

/// Splits an operator token into its comparison kind and negation flag.
pub fn classify(token: &str) -> Result<Comparator> {
    let invalid = || FilterError::InvalidOperator { token: token.to_string() };
    let captures = OPERATOR.captures(token).ok_or_else(invalid)?;
    let negated = captures.name("negation").is_some();
    let kind = captures
        .name("marker")
        .and_then(|m| ComparatorKind::from_marker(m.as_str()))
        .ok_or_else(invalid)?;
    trace!(token, ?kind, negated, "classified operator");
    Ok(Comparator { kind, negated })
}

impl FromStr for Comparator {
    type Err = FilterError;
    fn from_str(s: &str) -> Result<Self> {
        classify(s)
    }
}
