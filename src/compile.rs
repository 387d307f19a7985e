//! Clause compilation.
//!
//! Compiling a clause classifies its operator token, resolves its field path
//! against the entity schema and coerces the raw operand to the declared type
//! of the resolved attribute. The operator goes first, so a bad token is
//! reported as such whatever the path and value look like.

// used for date and date-time attributes
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::clause::{FilterClause, RawValue};
use crate::comparator::{classify, ComparatorKind};
use crate::error::{FilterError, Result};
use crate::predicate::Predicate;
use crate::schema::{EntitySchema, ResolvedAttribute, SemanticType};
use crate::settings::Settings;
use crate::value::{has_wildcards, Decimal, LikePattern, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateCompiler {
    date_format: String,
    datetime_format: String,
    max_clauses: Option<usize>,
}

impl Default for PredicateCompiler {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl PredicateCompiler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            date_format: settings.date_format.clone(),
            datetime_format: settings.datetime_format.clone(),
            max_clauses: settings.max_clauses,
        }
    }
    pub fn max_clauses(&self) -> Option<usize> {
        self.max_clauses
    }

    pub fn compile(&self, clause: &FilterClause, schema: &EntitySchema) -> Result<Predicate> {
        let comparator = classify(clause.comparator_token())?;
        let attribute = schema.resolve(clause.field_path())?;
        let value = self.coerce(&attribute, comparator.kind, clause.raw_value())?;
        debug!(
            entity = schema.entity(),
            path = %attribute.path,
            kind = %comparator.kind,
            negated = comparator.negated,
            value = %value,
            "compiled clause"
        );
        let predicate = Predicate::Compare { attribute, kind: comparator.kind, value };
        Ok(if comparator.negated { !predicate } else { predicate })
    }

    fn coerce(&self, attribute: &ResolvedAttribute, kind: ComparatorKind, raw: &RawValue) -> Result<Value> {
        let semantic_type = attribute.semantic_type;
        match kind {
            ComparatorKind::In => {
                let items: Vec<RawValue> = match raw {
                    RawValue::List(items) => items.clone(),
                    RawValue::Text(s) => s
                        .split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(RawValue::from)
                        .collect(),
                    scalar => vec![scalar.clone()],
                };
                if items.is_empty() {
                    return Err(FilterError::type_mismatch(
                        &attribute.path,
                        format!("non-empty set of {}", semantic_type),
                        raw,
                    ));
                }
                let values = items
                    .iter()
                    .map(|item| self.coerce_scalar(attribute, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(values))
            }
            ComparatorKind::Like => {
                let text = match (semantic_type, raw) {
                    (SemanticType::Text, RawValue::Text(s)) => s.clone(),
                    (SemanticType::Text, RawValue::Integer(_) | RawValue::Number(_)) => raw.to_string(),
                    _ => return Err(FilterError::type_mismatch(&attribute.path, "text pattern", raw)),
                };
                let pattern = if has_wildcards(&text) { text } else { format!("%{}%", text) };
                LikePattern::new(pattern)
                    .map(Value::Pattern)
                    .map_err(|_| FilterError::type_mismatch(&attribute.path, "text pattern within the size limit", raw))
            }
            ordering if ordering.is_ordering() && !semantic_type.is_ordered() => Err(FilterError::type_mismatch(
                &attribute.path,
                format!("attribute with an ordering (found {})", semantic_type.name()),
                raw,
            )),
            _ => self.coerce_scalar(attribute, raw),
        }
    }

    fn coerce_scalar(&self, attribute: &ResolvedAttribute, raw: &RawValue) -> Result<Value> {
        let semantic_type = attribute.semantic_type;
        let mismatch = || FilterError::type_mismatch(&attribute.path, semantic_type, raw);
        match (semantic_type, raw) {
            (_, RawValue::List(_)) => Err(mismatch()),
            (SemanticType::Text, RawValue::Text(s)) => Ok(Value::Text(s.clone())),
            (SemanticType::Text, other) => Ok(Value::Text(other.to_string())),
            (SemanticType::Integer, RawValue::Integer(i)) => Ok(Value::Integer(*i)),
            (SemanticType::Integer, RawValue::Number(n))
                if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 =>
            {
                Ok(Value::Integer(*n as i64))
            }
            (SemanticType::Integer, RawValue::Text(s)) => {
                s.trim().parse::<i64>().map(Value::Integer).map_err(|_| mismatch())
            }
            (SemanticType::Decimal, RawValue::Integer(_) | RawValue::Number(_) | RawValue::Text(_)) => {
                let decimal = match raw {
                    RawValue::Integer(i) => Ok(Decimal::from(*i)),
                    RawValue::Number(n) => n.to_string().parse::<Decimal>(),
                    _ => raw.to_string().trim().parse::<Decimal>(),
                }
                .map_err(|_| mismatch())?;
                // decimals are stored as REAL, so an operand has to survive the round trip
                if decimal.to_exact_f64().is_none() {
                    return Err(FilterError::type_mismatch(&attribute.path, "decimal with an exact 64-bit float form", raw));
                }
                Ok(Value::Decimal(decimal))
            }
            (SemanticType::Boolean, RawValue::Boolean(b)) => Ok(Value::Boolean(*b)),
            (SemanticType::Boolean, RawValue::Text(s)) => match s.as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(mismatch()),
            },
            (SemanticType::Date, RawValue::Text(s)) => NaiveDate::parse_from_str(s.trim(), &self.date_format)
                .map(Value::Date)
                .map_err(|_| mismatch()),
            (SemanticType::DateTime, RawValue::Text(s)) => {
                NaiveDateTime::parse_from_str(s.trim(), &self.datetime_format)
                    .map(Value::DateTime)
                    .map_err(|_| mismatch())
            }
            (SemanticType::Enumerated(values), RawValue::Text(s)) if values.iter().any(|v| *v == s.as_str()) => {
                Ok(Value::Enumerated(s.clone()))
            }
            _ => Err(mismatch()),
        }
    }
}

/// Compiles with default settings.
pub fn compile(clause: &FilterClause, schema: &EntitySchema) -> Result<Predicate> {
    PredicateCompiler::default().compile(clause, schema)
}
