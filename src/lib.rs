//! nabavka-filter – dynamic predicate composition for procurement searches.
//!
//! A search screen produces an open-ended list of filter criteria, each of the
//! form `(field path, operator, value)`. Rather than writing one query per
//! combination of criteria, every criterion is compiled on its own against
//! the target entity's attribute schema and the results are folded into a
//! single conjunctive [`predicate::Predicate`], which any
//! [`collection::QueryableCollection`] can execute.
//!
//! ## Modules
//! * [`clause`] – [`clause::FilterClause`], the untyped criterion, and its JSON form.
//! * [`comparator`] – Parses operator tokens (`=`, `!=`, `>=`, `~`, `in`, `not like`, …).
//! * [`schema`] – Static per-entity attribute schemas and field path resolution.
//! * [`value`] – Typed operands, decimal support and LIKE pattern matching.
//! * [`compile`] – Turns one clause into one predicate, coercing its operand.
//! * [`compose`] – [`compose::PredicateComposer`], the accumulate-then-build builder.
//! * [`predicate`] – The compiled predicate and its in-memory evaluation.
//! * [`collection`] – The queryable collection capability plus an in-memory one.
//! * [`sql`] / [`persist`] – SQLite rendering and the SQLite-backed collection.
//! * [`procurement`] – The procurement entities (locations, conversions,
//!   purchase costs, calculations, articles) with their schemas.
//! * [`settings`] / [`logging`] – Configuration and `tracing` setup.
//!
//! ## Operators
//! `=` (also `:`), `<>`, `>`, `<`, `>=`, `<=`, `~` (LIKE) and `@` (IN), or the
//! words `eq`, `ne`, `gt`, `lt`, `ge`, `le`, `like`, `in`. Any operator may be
//! negated with a leading `!` or `not `, so `!=` is a negated equality.
//! A LIKE operand without `%` or `_` matches as a substring.
//!
//! ## Quick Start
//! ```
//! use nabavka_filter::compose::PredicateComposer;
//! use nabavka_filter::collection::{MemoryCollection, QueryableCollection};
//! use nabavka_filter::procurement::{Location, LOCATION};
//!
//! let locations = MemoryCollection::new(vec![
//!     Location { id: 1, name: "Magacin".into(), address: "Mite Ruzica 3".into() },
//!     Location { id: 2, name: "Lokacija 2".into(), address: "Knez Mihailova 6".into() },
//! ]);
//! let mut composer = PredicateComposer::new();
//! composer.with_clause("address", "~", "Ruzica").with_clause("locationId", "<", 5);
//! let predicate = composer.build(&LOCATION).unwrap();
//! let found = locations.find_matching(predicate.as_ref()).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].id, 1);
//! ```
//!
//! ## Errors
//! Compilation fails with [`error::FilterError::InvalidOperator`],
//! [`error::FilterError::UnknownAttribute`] or
//! [`error::FilterError::TypeMismatch`]; building is all-or-nothing, the first
//! failing clause aborts it.

pub mod clause;
pub mod collection;
pub mod comparator;
pub mod compile;
pub mod compose;
pub mod error;
pub mod logging;
pub mod persist;
pub mod predicate;
pub mod procurement;
pub mod schema;
pub mod settings;
pub mod sql;
pub mod value;

pub use clause::{FilterClause, RawValue};
pub use compose::PredicateComposer;
pub use error::{FilterError, Result};
pub use predicate::Predicate;
