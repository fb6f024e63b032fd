//! Nested predicate builder.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Builder matching parent documents through the nested documents of an
/// object field.
#[derive(Debug, Clone)]
pub struct NestedPredicateBuilder {
    field: FieldDescriptor,
    inner: Option<SearchPredicate>,
    score: ScoreOptions,
}

impl NestedPredicateBuilder {
    /// Create a builder targeting the given nested object field.
    pub fn new(field: FieldDescriptor) -> Self {
        NestedPredicateBuilder {
            field,
            inner: None,
            score: ScoreOptions::default(),
        }
    }

    /// Path of the nested object.
    pub fn path(&self) -> &str {
        self.field.path()
    }

    /// Set the predicate nested documents must match.
    pub fn nested(&mut self, inner: SearchPredicate) {
        self.inner = Some(inner);
    }
}

impl SearchPredicateBuilder for NestedPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let inner = self.inner.ok_or_else(|| {
            PilumError::invalid_argument(format!(
                "no predicate for nested object '{}'",
                self.field.path()
            ))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Nested {
                path: self.field.path().to_string(),
                inner: Box::new(inner),
            },
            self.score,
        ))
    }
}
