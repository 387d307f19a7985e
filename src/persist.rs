// used for persistence
use rusqlite::{params_from_iter, Connection, Row};
use tracing::debug;

use crate::collection::QueryableCollection;
use crate::error::Result;
use crate::predicate::Predicate;
use crate::schema::{AttributeKind, EntitySchema, SemanticType};
use crate::sql::{quote, select};

pub type RowMapper<E> = fn(&Row<'_>) -> rusqlite::Result<E>;

/// A table in a SQLite database, read through a row mapper.
pub struct SqliteCollection<'c, E> {
    connection: &'c Connection,
    schema: &'static EntitySchema,
    mapper: RowMapper<E>,
}

impl<'c, E> SqliteCollection<'c, E> {
    pub fn new(connection: &'c Connection, schema: &'static EntitySchema, mapper: RowMapper<E>) -> Self {
        Self { connection, schema, mapper }
    }
}

impl<E> QueryableCollection for SqliteCollection<'_, E> {
    type Entity = E;
    fn find_matching(&self, predicate: Option<&Predicate>) -> Result<Vec<E>> {
        let query = select(self.schema, predicate);
        debug!(entity = self.schema.entity(), sql = %query.sql, params = query.params.len(), "running filter");
        let mut statement = self.connection.prepare(&query.sql)?;
        let rows = statement.query_map(params_from_iter(query.params.iter()), self.mapper)?;
        let mut entities = Vec::new();
        for row in rows {
            entities.push(row?);
        }
        Ok(entities)
    }
}

fn column_type(semantic_type: SemanticType) -> &'static str {
    match semantic_type {
        SemanticType::Integer | SemanticType::Boolean => "INTEGER",
        SemanticType::Decimal => "REAL",
        SemanticType::Text | SemanticType::Date | SemanticType::DateTime | SemanticType::Enumerated(_) => "TEXT",
    }
}

/// DDL for the table behind a schema. Join attributes become foreign keys.
pub fn table_definition(schema: &EntitySchema) -> String {
    let mut columns = Vec::new();
    if !schema.attributes().iter().any(|a| a.column() == schema.primary_key()) {
        columns.push(format!("{} INTEGER PRIMARY KEY", quote(schema.primary_key())));
    }
    for attribute in schema.attributes() {
        let column = quote(attribute.column());
        let definition = match attribute.kind() {
            AttributeKind::Scalar(_) if attribute.column() == schema.primary_key() => {
                format!("{} INTEGER PRIMARY KEY", column)
            }
            AttributeKind::Scalar(semantic_type) => format!("{} {}", column, column_type(*semantic_type)),
            AttributeKind::Join(target) => format!(
                "{} INTEGER REFERENCES {}({})",
                column,
                quote(target.table()),
                quote(target.primary_key())
            ),
        };
        columns.push(definition);
    }
    format!("CREATE TABLE IF NOT EXISTS {} ({})", quote(schema.table()), columns.join(", "))
}

/// Creates the tables for the given schemas, in order.
pub fn create_tables(connection: &Connection, schemas: &[&EntitySchema]) -> Result<()> {
    for schema in schemas {
        let ddl = table_definition(schema);
        debug!(entity = schema.entity(), %ddl, "creating table");
        connection.execute_batch(&ddl)?;
    }
    Ok(())
}
