//! `not()` step.

use crate::dsl::PredicateFinalStep;
use crate::error::Result;
use crate::query::boolean::BooleanPredicateBuilder;
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;

/// Negation of a predicate, backed by a boolean builder holding one
/// `must_not` clause.
pub struct NotPredicateFinalStep {
    builder: BooleanPredicateBuilder,
}

impl NotPredicateFinalStep {
    pub(crate) fn new(mut builder: BooleanPredicateBuilder, negated: SearchPredicate) -> Self {
        builder.must_not(negated);
        NotPredicateFinalStep { builder }
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.builder.boost(boost);
        self
    }

    pub fn constant_score(mut self) -> Self {
        self.builder.constant_score();
        self
    }
}

impl PredicateFinalStep for NotPredicateFinalStep {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.builder.build()
    }
}
