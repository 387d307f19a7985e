use tracing::{debug, warn};

use crate::clause::{FilterClause, RawValue};
use crate::compile::PredicateCompiler;
use crate::error::{FilterError, Result};
use crate::predicate::Predicate;
use crate::schema::EntitySchema;

/// Accumulates filter clauses and folds them into one conjunctive predicate.
///
/// Building does not consume or reset the composer: clauses added after a
/// `build` are compiled together with the earlier ones on the next `build`.
/// A composer is meant to live for a single request on a single thread.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PredicateComposer {
    clauses: Vec<FilterClause>,
}

impl PredicateComposer {
    pub fn new() -> Self {
        Self { clauses: Vec::new() }
    }
    pub fn with_clause(
        &mut self,
        field_path: impl Into<String>,
        comparator_token: impl Into<String>,
        raw_value: impl Into<RawValue>,
    ) -> &mut Self {
        self.with(FilterClause::new(field_path, comparator_token, raw_value))
    }
    pub fn with(&mut self, clause: FilterClause) -> &mut Self {
        self.clauses.push(clause);
        self
    }
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }
    pub fn len(&self) -> usize {
        self.clauses.len()
    }
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// `Ok(None)` means there is nothing to filter on.
    pub fn build(&self, schema: &EntitySchema) -> Result<Option<Predicate>> {
        self.build_with(schema, &PredicateCompiler::default())
    }

    pub fn build_with(&self, schema: &EntitySchema, compiler: &PredicateCompiler) -> Result<Option<Predicate>> {
        if let Some(limit) = compiler.max_clauses() {
            if self.clauses.len() > limit {
                return Err(FilterError::TooManyClauses { count: self.clauses.len(), limit });
            }
        }
        let mut compiled = self.clauses.iter().map(|clause| {
            compiler
                .compile(clause, schema)
                .inspect_err(|e| warn!(entity = schema.entity(), %clause, error = %e, "rejected clause"))
        });
        let Some(first) = compiled.next() else {
            debug!(entity = schema.entity(), "no clauses, matching everything");
            return Ok(None);
        };
        let mut composed = first?;
        for predicate in compiled {
            composed = composed.and(predicate?);
        }
        debug!(entity = schema.entity(), clauses = self.clauses.len(), predicate = %composed, "composed predicate");
        Ok(Some(composed))
    }
}

impl Extend<FilterClause> for PredicateComposer {
    fn extend<I: IntoIterator<Item = FilterClause>>(&mut self, iter: I) {
        self.clauses.extend(iter);
    }
}
impl FromIterator<FilterClause> for PredicateComposer {
    fn from_iter<I: IntoIterator<Item = FilterClause>>(iter: I) -> Self {
        Self { clauses: iter.into_iter().collect() }
    }
}
