//! # Pilum
//!
//! A fluent, strongly-typed predicate DSL for full-text search engines.
//!
//! ## Features
//!
//! - Multi-field predicates with per-field boosts
//! - Type-checked field resolution against an index schema
//! - Boolean composition with minimum-should-match brackets
//! - Negation, nested objects, knn filters and match-all exclusions
//! - Elasticsearch-flavoured JSON query parsing

pub mod cli;
pub mod config;
pub mod dsl;
pub mod error;
pub mod parser;
pub mod query;
pub mod schema;
pub mod scope;
pub mod spatial;
pub mod value;

pub mod prelude {
    pub use crate::dsl::{MinimumShouldMatchParent, PredicateFinalStep, SearchPredicateFactory};
    pub use crate::error::{PilumError, Result};
    pub use crate::query::{Range, SearchPredicate};
    pub use crate::schema::IndexSchema;
    pub use crate::value::FieldValue;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
