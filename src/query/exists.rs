//! Exists predicate builder.

use crate::error::Result;
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;

/// Builder for a predicate matching documents with a value for a field.
#[derive(Debug, Clone)]
pub struct ExistsPredicateBuilder {
    field: FieldDescriptor,
    score: ScoreOptions,
}

impl ExistsPredicateBuilder {
    pub fn new(field: FieldDescriptor) -> Self {
        ExistsPredicateBuilder {
            field,
            score: ScoreOptions::default(),
        }
    }
}

impl SearchPredicateBuilder for ExistsPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        Ok(SearchPredicate::new(
            PredicateKind::Exists {
                field: self.field.path().to_string(),
            },
            self.score,
        ))
    }
}
