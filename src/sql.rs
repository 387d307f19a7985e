//! Rendering predicates as SQLite queries.
//!
//! Every distinct join path becomes one `LEFT JOIN`, so a missing related
//! row yields NULL and the comparison is unknown, exactly as in-memory
//! evaluation treats it. Operands are always bound as positional parameters.
//! LIKE is rendered as `GLOB` to keep pattern matching case-sensitive.

use rusqlite::types::Value as SqlValue;

use crate::comparator::ComparatorKind;
use crate::predicate::Predicate;
use crate::schema::{EntitySchema, ResolvedAttribute};
use crate::value::Value;

pub const ROOT_ALIAS: &str = "t0";
/// How dates are stored as text.
pub const DATE_STORAGE: &str = "%Y-%m-%d";
/// How date-times are stored as text.
pub const DATETIME_STORAGE: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

struct Join {
    path: String,
    alias: String,
    clause: String,
}

#[derive(Default)]
struct Renderer {
    joins: Vec<Join>,
    params: Vec<SqlValue>,
}

impl Renderer {
    fn alias_for(&mut self, attribute: &ResolvedAttribute) -> String {
        let mut alias = ROOT_ALIAS.to_string();
        let mut path = String::new();
        for step in &attribute.joins {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(step.attribute);
            alias = match self.joins.iter().find(|j| j.path == path) {
                Some(join) => join.alias.clone(),
                None => {
                    let next = format!("j{}", self.joins.len() + 1);
                    let clause = format!(
                        "LEFT JOIN {} {next} ON {next}.{} = {alias}.{}",
                        quote(step.table),
                        quote(step.primary_key),
                        quote(step.foreign_key)
                    );
                    self.joins.push(Join { path: path.clone(), alias: next.clone(), clause });
                    next
                }
            };
        }
        alias
    }

    fn bind(&mut self, value: SqlValue) -> &'static str {
        self.params.push(value);
        "?"
    }

    fn render(&mut self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::Compare { attribute, kind, value } => {
                let column = format!("{}.{}", self.alias_for(attribute), quote(attribute.column));
                match kind {
                    ComparatorKind::In => {
                        let items = match value {
                            Value::List(items) => items.as_slice(),
                            single => std::slice::from_ref(single),
                        };
                        let holders: Vec<&str> = items.iter().map(|item| self.bind(to_sql_value(item))).collect();
                        format!("{} IN ({})", column, holders.join(", "))
                    }
                    ComparatorKind::Like => {
                        let pattern = glob_pattern(value.as_text().unwrap_or_default());
                        format!("{} GLOB {}", column, self.bind(SqlValue::Text(pattern)))
                    }
                    ComparatorKind::NotEqual => format!("{} <> {}", column, self.bind(to_sql_value(value))),
                    other => format!("{} {} {}", column, other.symbol(), self.bind(to_sql_value(value))),
                }
            }
            Predicate::Not(inner) => format!("NOT ({})", self.render(inner)),
            Predicate::And(left, right) => {
                let left = self.render(left);
                let right = self.render(right);
                format!("({}) AND ({})", left, right)
            }
        }
    }
}

/// `SELECT` of all columns of the schema's table, restricted by the predicate
/// and ordered by primary key.
pub fn select(schema: &EntitySchema, predicate: Option<&Predicate>) -> SqlQuery {
    let mut renderer = Renderer::default();
    let condition = predicate.map(|p| renderer.render(p));
    let mut sql = format!("SELECT {ROOT_ALIAS}.* FROM {} {ROOT_ALIAS}", quote(schema.table()));
    for join in &renderer.joins {
        sql.push(' ');
        sql.push_str(&join.clause);
    }
    if let Some(condition) = condition {
        sql.push_str(" WHERE ");
        sql.push_str(&condition);
    }
    sql.push_str(&format!(" ORDER BY {ROOT_ALIAS}.{}", quote(schema.primary_key())));
    SqlQuery { sql, params: renderer.params }
}

pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Text(s) | Value::Enumerated(s) => SqlValue::Text(s.clone()),
        Value::Pattern(p) => SqlValue::Text(p.as_str().to_string()),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Decimal(d) => d.to_f64().map_or(SqlValue::Null, SqlValue::Real),
        Value::Boolean(b) => SqlValue::Integer(i64::from(*b)),
        Value::Date(d) => SqlValue::Text(d.format(DATE_STORAGE).to_string()),
        Value::DateTime(d) => SqlValue::Text(d.format(DATETIME_STORAGE).to_string()),
        Value::List(_) => SqlValue::Null,
    }
}

pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Translates a LIKE pattern into a GLOB pattern, escaping GLOB's own
/// metacharacters with single-character classes.
pub fn glob_pattern(like: &str) -> String {
    let mut glob = String::with_capacity(like.len());
    for c in like.chars() {
        match c {
            '%' => glob.push('*'),
            '_' => glob.push('?'),
            '*' | '?' | '[' => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            c => glob.push(c),
        }
    }
    glob
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::clause::FilterClause;
    use crate::schema::{Attribute, SemanticType};

    const OWNER_ATTRIBUTES: &[Attribute] = &[Attribute::scalar("name", "full_name", SemanticType::Text)];
    const OWNER: EntitySchema = EntitySchema::new("Owner", "owner", "owner_id", OWNER_ATTRIBUTES);
    const SHOP_ATTRIBUTES: &[Attribute] = &[
        Attribute::scalar("code", "code", SemanticType::Text),
        Attribute::scalar("size", "size", SemanticType::Integer),
        Attribute::join("owner", "owner_id", &OWNER),
    ];
    const SHOP: EntitySchema = EntitySchema::new("Shop", "shop", "id", SHOP_ATTRIBUTES);

    fn predicate(clauses: &[(&str, &str, &str)]) -> Predicate {
        clauses
            .iter()
            .map(|(path, token, raw)| compile(&FilterClause::new(*path, *token, *raw), &SHOP).unwrap())
            .reduce(Predicate::and)
            .unwrap()
    }

    #[test]
    fn unfiltered_select() {
        let query = select(&SHOP, None);
        assert_eq!(query.sql, r#"SELECT t0.* FROM "shop" t0 ORDER BY t0."id""#);
        assert!(query.params.is_empty());
    }

    #[test]
    fn joins_are_shared_per_path() {
        let p = predicate(&[("owner.name", "=", "Ana"), ("size", "!>", "3"), ("owner.name", "~", "A")]);
        let query = select(&SHOP, Some(&p));
        assert_eq!(
            query.sql,
            concat!(
                r#"SELECT t0.* FROM "shop" t0 LEFT JOIN "owner" j1 ON j1."owner_id" = t0."owner_id""#,
                r#" WHERE ((j1."full_name" = ?) AND (NOT (t0."size" > ?))) AND (j1."full_name" GLOB ?)"#,
                r#" ORDER BY t0."id""#
            )
        );
        assert_eq!(
            query.params,
            vec![SqlValue::Text("Ana".into()), SqlValue::Integer(3), SqlValue::Text("*A*".into())]
        );
    }

    #[test]
    fn membership_binds_every_item() {
        let p = predicate(&[("size", "in", "1,2,3"), ("code", "<>", "x")]);
        let query = select(&SHOP, Some(&p));
        assert!(query.sql.contains(r#"t0."size" IN (?, ?, ?)"#));
        assert!(query.sql.contains(r#"t0."code" <> ?"#));
        assert_eq!(query.params.len(), 4);
    }

    #[test]
    fn glob_escapes_metacharacters() {
        assert_eq!(glob_pattern("%a_b%"), "*a?b*");
        assert_eq!(glob_pattern("5*[x]?"), "5[*][[]x][?]");
    }
}
