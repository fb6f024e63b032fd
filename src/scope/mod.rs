//! The two collaborator interfaces predicate composition depends on.
//!
//! * field resolution: `(absolute field path, predicate type key)` → a
//!   type-checked predicate builder, or a typed error;
//! * boolean builder factory: an empty [`BooleanPredicateBuilder`].
//!
//! Both are exposed by [`SearchIndexScope`]. [`crate::schema::IndexSchema`]
//! is the in-crate implementation.

pub mod keys;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use crate::config::DslConfig;
use crate::dsl::named::NamedPredicateProvider;
use crate::error::{PilumError, Result};
use crate::query::boolean::BooleanPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// When a predicate kind resolves its field builders.
///
/// Error timing is part of the contract: eager kinds fail on `field(...)`,
/// lazy kinds fail on the call that supplies the value (`matching(...)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTiming {
    /// Resolve on `field(...)` / `fields(...)`.
    Eager,
    /// Resolve on the terminal value call.
    Lazy,
}

/// Identifies a predicate kind and the builder a field produces for it.
pub struct PredicateTypeKey<B> {
    name: &'static str,
    timing: ResolutionTiming,
    create: fn(FieldDescriptor) -> B,
    _builder: PhantomData<fn() -> B>,
}

impl<B> PredicateTypeKey<B> {
    /// Create a new key.
    pub const fn new(
        name: &'static str,
        timing: ResolutionTiming,
        create: fn(FieldDescriptor) -> B,
    ) -> Self {
        PredicateTypeKey {
            name,
            timing,
            create,
            _builder: PhantomData,
        }
    }

    /// Name of the predicate kind.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolution timing of the predicate kind.
    pub fn timing(&self) -> ResolutionTiming {
        self.timing
    }
}

impl<B> Clone for PredicateTypeKey<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for PredicateTypeKey<B> {}

impl<B> fmt::Debug for PredicateTypeKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateTypeKey")
            .field("name", &self.name)
            .field("timing", &self.timing)
            .finish()
    }
}

/// Access to the fields and named predicates of the indexes being searched.
pub trait SearchIndexScope: Send + Sync {
    /// Composition limits.
    fn config(&self) -> &DslConfig;

    /// Look up a field by absolute path.
    fn field_descriptor(&self, absolute_path: &str) -> Option<&FieldDescriptor>;

    /// Look up a named predicate by `objectPath.name`.
    fn named_predicate(&self, path: &str) -> Option<Arc<dyn NamedPredicateProvider>>;

    /// Create an empty boolean builder.
    fn new_boolean_builder(&self) -> BooleanPredicateBuilder {
        BooleanPredicateBuilder::new(self.config().max_clause_count)
    }
}

impl dyn SearchIndexScope + '_ {
    /// Resolve a field into the builder for the given predicate kind.
    pub fn field_query_element<B>(&self, absolute_path: &str, key: PredicateTypeKey<B>) -> Result<B> {
        let field = self
            .field_descriptor(absolute_path)
            .ok_or_else(|| PilumError::unknown_field(absolute_path))?;

        if !field.supports(key.name()) {
            return Err(PilumError::unsupported_predicate(absolute_path, key.name()));
        }

        trace!(field = absolute_path, predicate = key.name(), "resolved field builder");
        Ok((key.create)(field.clone()))
    }
}
