//! `id()` step.

use crate::dsl::PredicateFinalStep;
use crate::error::Result;
use crate::query::match_all::IdPredicateBuilder;
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;

/// Matches documents by identifier; calls accumulate.
#[derive(Debug, Default)]
pub struct IdPredicateMatchingStep {
    builder: IdPredicateBuilder,
}

impl IdPredicateMatchingStep {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Match the document with this identifier.
    pub fn matching<S: Into<String>>(mut self, id: S) -> Self {
        self.builder.values([id]);
        self
    }

    /// Match documents with any of these identifiers.
    pub fn matching_any<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder.values(ids);
        self
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

impl PredicateFinalStep for IdPredicateMatchingStep {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.builder.build()
    }
}
