use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An untyped operand as supplied by the caller. Dates travel as text and are
/// only interpreted once the attribute they target is known.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RawValue::Boolean(b) => write!(f, "{}", b),
            RawValue::Integer(i) => write!(f, "{}", i),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::List(items) => {
                let items: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", items.join(","))
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}
impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}
impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Integer(i)
    }
}
impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Integer(i64::from(i))
    }
}
impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}
impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Boolean(b)
    }
}
impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A single `field operator value` filter criterion.
///
/// Clauses are immutable once built; nothing is validated until the clause
/// is compiled against a schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    #[serde(rename = "field", alias = "key")]
    field_path: String,
    #[serde(rename = "operator", alias = "operation")]
    comparator_token: String,
    #[serde(rename = "value")]
    raw_value: RawValue,
}

impl FilterClause {
    pub fn new(
        field_path: impl Into<String>,
        comparator_token: impl Into<String>,
        raw_value: impl Into<RawValue>,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            comparator_token: comparator_token.into(),
            raw_value: raw_value.into(),
        }
    }
    pub fn field_path(&self) -> &str {
        &self.field_path
    }
    pub fn comparator_token(&self) -> &str {
        &self.comparator_token
    }
    pub fn raw_value(&self) -> &RawValue {
        &self.raw_value
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.field_path, self.comparator_token, self.raw_value)
    }
}

/// Reads a JSON array of `{"field", "operator", "value"}` objects.
pub fn clauses_from_json(payload: &str) -> Result<Vec<FilterClause>> {
    Ok(serde_json::from_str(payload)?)
}
