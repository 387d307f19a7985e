// used for date and date-time attributes
use chrono::{NaiveDate, NaiveDateTime};
// used for decimal numbers
use bigdecimal::{BigDecimal, ParseBigDecimalError, ToPrimitive};
// used to turn LIKE patterns into something we can match with
use regex::Regex;

use std::cmp::Ordering;
// used to print out readable forms of a value
use std::fmt;
use std::ops;
use std::str::FromStr;

/// Characters that make a LIKE operand a pattern rather than a plain substring.
pub const WILDCARDS: [char; 2] = ['%', '_'];

// ------------- Decimal -------------
#[derive(Eq, PartialEq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }
    /// The `f64` holding exactly this decimal, if there is one.
    pub fn to_exact_f64(&self) -> Option<f64> {
        let f = self.0.to_f64().filter(|f| f.is_finite())?;
        let back = BigDecimal::from_str(&f.to_string()).ok()?;
        (back == self.0).then_some(f)
    }
}
impl FromStr for Decimal {
    type Err = ParseBigDecimalError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s).map(Decimal)
    }
}
impl From<i64> for Decimal {
    fn from(i: i64) -> Self {
        Decimal(BigDecimal::from(i))
    }
}
impl From<BigDecimal> for Decimal {
    fn from(d: BigDecimal) -> Self {
        Decimal(d)
    }
}
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl ops::Deref for Decimal {
    type Target = BigDecimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ------------- Value -------------
/// A value coerced to the declared type of an attribute, or read back from a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Enumerated(String),
    /// Operand of a membership test.
    List(Vec<Value>),
    /// Operand of a LIKE comparison.
    Pattern(LikePattern),
}

impl Value {
    /// Orders two values of compatible types. Integers and decimals compare
    /// numerically, everything else only against its own kind.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b))
            | (Value::Enumerated(a), Value::Enumerated(b))
            | (Value::Text(a), Value::Enumerated(b))
            | (Value::Enumerated(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (Value::Decimal(a), Value::Integer(b)) => Some(a.cmp(&Decimal::from(*b))),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Enumerated(s) => Some(s),
            Value::Pattern(p) => Some(p.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Text(s) | Value::Enumerated(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Pattern(p) => write!(f, "'{}'", p.as_str().replace('\'', "''")),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Value::DateTime(d) => write!(f, "'{}'", d.format("%Y-%m-%dT%H:%M:%S")),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
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
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}
impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}
impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::DateTime(d)
    }
}

// ------------- LIKE patterns -------------
pub fn has_wildcards(s: &str) -> bool {
    s.contains(WILDCARDS)
}

/// A LIKE pattern (`%` for any run, `_` for a single character) together with
/// the anchored regular expression it was translated into. Two patterns are
/// equal when their source text is.
#[derive(Clone)]
pub struct LikePattern {
    pattern: String,
    regex: Regex,
}

impl LikePattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let mut expression = String::from("(?s)^");
        let mut buffer = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '%' => expression.push_str(".*"),
                '_' => expression.push('.'),
                c => expression.push_str(&regex::escape(c.encode_utf8(&mut buffer))),
            }
        }
        expression.push('$');
        let regex = Regex::new(&expression)?;
        Ok(Self { pattern, regex })
    }
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}
impl Eq for LikePattern {}
impl fmt::Debug for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("LikePattern").field(&self.pattern).finish()
    }
}
