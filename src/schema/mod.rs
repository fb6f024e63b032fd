//! Schema module for Pilum.
//!
//! This module provides field descriptors and the [`IndexSchema`] that
//! resolves field paths into predicate builders.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

pub use field::{FieldDescriptor, FieldKind};
pub use schema::{FieldConfig, IndexSchema, SchemaBuilder, SchemaConfig};
