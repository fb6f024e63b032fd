//! Match-all, match-none and id predicate builders.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;

/// Builder for a predicate matching every document.
#[derive(Debug, Clone, Default)]
pub struct MatchAllPredicateBuilder {
    score: ScoreOptions,
}

impl MatchAllPredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchPredicateBuilder for MatchAllPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        Ok(SearchPredicate::new(PredicateKind::MatchAll, self.score))
    }
}

/// Builder for a predicate matching documents by identifier.
#[derive(Debug, Clone, Default)]
pub struct IdPredicateBuilder {
    values: Vec<String>,
    score: ScoreOptions,
}

impl IdPredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add identifiers to match.
    pub fn values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Into::into));
    }
}

impl SearchPredicateBuilder for IdPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        if self.values.is_empty() {
            return Err(PilumError::invalid_argument(
                "at least one identifier is required",
            ));
        }
        Ok(SearchPredicate::new(
            PredicateKind::Id {
                values: self.values,
            },
            self.score,
        ))
    }
}
