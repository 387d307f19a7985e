//! Static attribute schemas.
//!
//! Every filterable entity describes its attributes once, as a constant
//! [`EntitySchema`]: a name, a column and either a semantic type or a join to
//! another entity. Field paths such as `location.name` are resolved against
//! these tables one segment at a time, with each join segment standing for a
//! single explicit join to the related entity.

use std::fmt;

use crate::error::{FilterError, Result};

// ------------- Semantic types -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    /// A closed set of values, matched case-sensitively.
    Enumerated(&'static [&'static str]),
}

impl SemanticType {
    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Text => "text",
            SemanticType::Integer => "integer",
            SemanticType::Decimal => "decimal",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::DateTime => "date-time",
            SemanticType::Enumerated(_) => "enumerated value",
        }
    }
    /// Whether relational comparators make sense for this type.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, SemanticType::Boolean | SemanticType::Enumerated(_))
    }
}
impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SemanticType::Enumerated(values) => write!(f, "one of {}", values.join("|")),
            other => write!(f, "{}", other.name()),
        }
    }
}

// ------------- Attributes -------------
pub enum AttributeKind {
    Scalar(SemanticType),
    /// The attribute's column is a foreign key to the related entity.
    Join(&'static EntitySchema),
}
impl fmt::Debug for AttributeKind {
    // only name the joined entity, related schemas may refer back to us
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttributeKind::Scalar(semantic_type) => write!(f, "Scalar({:?})", semantic_type),
            AttributeKind::Join(schema) => write!(f, "Join({})", schema.entity()),
        }
    }
}

#[derive(Debug)]
pub struct Attribute {
    name: &'static str,
    column: &'static str,
    kind: AttributeKind,
}

impl Attribute {
    pub const fn scalar(name: &'static str, column: &'static str, semantic_type: SemanticType) -> Self {
        Self { name, column, kind: AttributeKind::Scalar(semantic_type) }
    }
    pub const fn join(name: &'static str, column: &'static str, schema: &'static EntitySchema) -> Self {
        Self { name, column, kind: AttributeKind::Join(schema) }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn column(&self) -> &'static str {
        self.column
    }
    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }
}

// ------------- Entity schema -------------
#[derive(Debug)]
pub struct EntitySchema {
    entity: &'static str,
    table: &'static str,
    primary_key: &'static str,
    attributes: &'static [Attribute],
}

impl EntitySchema {
    pub const fn new(
        entity: &'static str,
        table: &'static str,
        primary_key: &'static str,
        attributes: &'static [Attribute],
    ) -> Self {
        Self { entity, table, primary_key, attributes }
    }
    pub fn entity(&self) -> &'static str {
        self.entity
    }
    pub fn table(&self) -> &'static str {
        self.table
    }
    pub fn primary_key(&self) -> &'static str {
        self.primary_key
    }
    pub fn attributes(&self) -> &'static [Attribute] {
        self.attributes
    }
    pub fn attribute(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Resolves a dot-separated field path to the scalar attribute it names.
    ///
    /// Every segment but the last has to be a join, the last one a scalar.
    /// Empty paths and empty segments never resolve.
    pub fn resolve(&self, path: &str) -> Result<ResolvedAttribute> {
        let unknown = || FilterError::UnknownAttribute {
            entity: self.entity.to_string(),
            path: path.to_string(),
        };
        let mut current = self;
        let mut joins = Vec::new();
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segment.is_empty() {
                return Err(unknown());
            }
            let attribute = current.attribute(segment).ok_or_else(unknown)?;
            match (attribute.kind(), segments.peek().is_some()) {
                (AttributeKind::Join(target), true) => {
                    joins.push(JoinStep {
                        attribute: attribute.name,
                        foreign_key: attribute.column,
                        table: target.table,
                        primary_key: target.primary_key,
                    });
                    current = *target;
                }
                (AttributeKind::Scalar(semantic_type), false) => {
                    return Ok(ResolvedAttribute {
                        path: path.to_string(),
                        entity: current.entity,
                        name: attribute.name,
                        column: attribute.column,
                        semantic_type: *semantic_type,
                        joins,
                    });
                }
                _ => return Err(unknown()),
            }
        }
        Err(unknown())
    }
}

/// Implemented by every entity type that can be filtered.
pub trait AttributeSchema {
    fn schema() -> &'static EntitySchema;
}

// ------------- Resolution results -------------
/// One hop from the entity reached so far to a related entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JoinStep {
    pub attribute: &'static str,
    pub foreign_key: &'static str,
    pub table: &'static str,
    pub primary_key: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedAttribute {
    /// The field path as given by the caller.
    pub path: String,
    /// Entity owning the final attribute.
    pub entity: &'static str,
    pub name: &'static str,
    pub column: &'static str,
    pub semantic_type: SemanticType,
    pub joins: Vec<JoinStep>,
}
