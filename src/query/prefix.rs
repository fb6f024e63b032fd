//! Prefix predicate builder.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Builder for a predicate matching terms that start with a prefix.
#[derive(Debug, Clone)]
pub struct PrefixPredicateBuilder {
    field: FieldDescriptor,
    prefix: Option<String>,
    score: ScoreOptions,
}

impl PrefixPredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        PrefixPredicateBuilder {
            field,
            prefix: None,
            score: ScoreOptions::default(),
        }
    }

    /// Set the prefix.
    pub fn prefix(&mut self, prefix: &str) {
        self.prefix = Some(prefix.to_string());
    }
}

impl SearchPredicateBuilder for PrefixPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let prefix = self.prefix.ok_or_else(|| {
            PilumError::invalid_argument(format!("no prefix for field '{}'", self.field.path()))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Prefix {
                field: self.field.path().to_string(),
                prefix,
            },
            self.score,
        ))
    }
}
