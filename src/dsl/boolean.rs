//! `bool()`, `and()` and `or()` steps.

use crate::dsl::PredicateFinalStep;
use crate::dsl::factory::SearchPredicateFactory;
use crate::dsl::minimum_should_match::MinimumShouldMatchParent;
use crate::error::Result;
use crate::query::boolean::BooleanPredicateBuilder;
use crate::query::minimum_should_match::MinimumShouldMatchBuilder;
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;

/// Accumulates clauses of a boolean predicate.
///
/// Clauses accept anything implementing [`PredicateFinalStep`]; the `*_with`
/// variants take a closure receiving the predicate factory.
pub struct BooleanPredicateClausesStep<'s> {
    factory: SearchPredicateFactory<'s>,
    builder: BooleanPredicateBuilder,
}

impl<'s> BooleanPredicateClausesStep<'s> {
    pub(crate) fn new(factory: SearchPredicateFactory<'s>) -> Self {
        let builder = factory.scope().new_boolean_builder();
        BooleanPredicateClausesStep { factory, builder }
    }

    /// Add a clause that must match.
    pub fn must(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        self.builder.must(clause.to_predicate()?);
        Ok(self)
    }

    /// Add a clause that should match.
    pub fn should(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        self.builder.should(clause.to_predicate()?);
        Ok(self)
    }

    /// Add a clause that must not match.
    pub fn must_not(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        self.builder.must_not(clause.to_predicate()?);
        Ok(self)
    }

    /// Add a clause that must match without affecting the score.
    pub fn filter(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        self.builder.filter(clause.to_predicate()?);
        Ok(self)
    }

    /// Add a must clause built from the factory.
    pub fn must_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.must(predicate)
    }

    /// Add a should clause built from the factory.
    pub fn should_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.should(predicate)
    }

    /// Add a must-not clause built from the factory.
    pub fn must_not_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.must_not(predicate)
    }

    /// Add a filter clause built from the factory.
    pub fn filter_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.filter(predicate)
    }

    /// Whether any clause has been added.
    pub fn has_clause(&self) -> bool {
        self.builder.has_clause()
    }

    /// Boost the boolean predicate.
    pub fn boost(mut self, boost: f32) -> Self {
        self.builder.boost(boost);
        self
    }

    /// Score the boolean predicate with a constant score.
    pub fn constant_score(mut self) -> Self {
        self.builder.constant_score();
        self
    }
}

impl MinimumShouldMatchParent for BooleanPredicateClausesStep<'_> {
    fn minimum_should_match_builder(&mut self) -> &mut dyn MinimumShouldMatchBuilder {
        &mut self.builder
    }
}

impl PredicateFinalStep for BooleanPredicateClausesStep<'_> {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.builder.build()
    }
}

/// Which clause `add` contributes in a [`SimpleBooleanPredicateClausesStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SimpleBooleanOperator {
    And,
    Or,
}

/// A conjunction or disjunction of clauses.
pub struct SimpleBooleanPredicateClausesStep<'s> {
    factory: SearchPredicateFactory<'s>,
    operator: SimpleBooleanOperator,
    builder: BooleanPredicateBuilder,
}

impl<'s> SimpleBooleanPredicateClausesStep<'s> {
    pub(crate) fn new(factory: SearchPredicateFactory<'s>, operator: SimpleBooleanOperator) -> Self {
        let builder = factory.scope().new_boolean_builder();
        SimpleBooleanPredicateClausesStep {
            factory,
            operator,
            builder,
        }
    }

    /// Add an operand.
    pub fn add(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        let predicate = clause.to_predicate()?;
        match self.operator {
            SimpleBooleanOperator::And => self.builder.must(predicate),
            SimpleBooleanOperator::Or => self.builder.should(predicate),
        }
        Ok(self)
    }

    /// Add an operand built from the factory.
    pub fn add_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.add(predicate)
    }

    /// Whether any operand has been added.
    pub fn has_clause(&self) -> bool {
        self.builder.has_clause()
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

impl MinimumShouldMatchParent for SimpleBooleanPredicateClausesStep<'_> {
    fn minimum_should_match_builder(&mut self) -> &mut dyn MinimumShouldMatchBuilder {
        &mut self.builder
    }
}

impl PredicateFinalStep for SimpleBooleanPredicateClausesStep<'_> {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.builder.build()
    }
}
