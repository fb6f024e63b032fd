//! Minimum-should-match sub-DSL.
//!
//! ```text
//! minimum_should_match()
//!     .if_more_than(c)?            -> requirement step
//!     .then_require_number(n)?     -> more step (forwards (c, n) now)
//!     .if_more_than(c2)? ...       -> another bracket
//!     .end()                       -> back to the parent step
//! ```
//!
//! A ceiling is always followed by exactly one requirement, so a pending
//! ceiling can never be overwritten.

use crate::dsl::PredicateFinalStep;
use crate::error::{PilumError, Result};
use crate::query::minimum_should_match::{MinimumShouldMatchBuilder, MinimumShouldMatchRequirement};
use crate::query::predicate::SearchPredicate;

/// A step owning a builder that accepts minimum-should-match brackets.
pub trait MinimumShouldMatchParent: Sized {
    /// The builder brackets are forwarded to.
    fn minimum_should_match_builder(&mut self) -> &mut dyn MinimumShouldMatchBuilder;

    /// Enter the sub-DSL.
    fn minimum_should_match(self) -> MinimumShouldMatchConditionStep<Self> {
        MinimumShouldMatchConditionStep { parent: self }
    }

    /// Require `n` optional clauses to match (negative: all but `n`).
    fn minimum_should_match_number(self, n: i32) -> Result<Self> {
        Ok(self
            .minimum_should_match()
            .if_more_than(0)?
            .then_require_number(n)?
            .end())
    }

    /// Require `p`% of optional clauses to match (negative: all but `p`%).
    fn minimum_should_match_percent(self, p: i32) -> Result<Self> {
        Ok(self
            .minimum_should_match()
            .if_more_than(0)?
            .then_require_percent(p)?
            .end())
    }
}

/// Waiting for a ceiling.
pub struct MinimumShouldMatchConditionStep<P> {
    parent: P,
}

impl<P: MinimumShouldMatchParent> MinimumShouldMatchConditionStep<P> {
    /// Apply the next requirement when there are more than `ceiling`
    /// optional clauses.
    pub fn if_more_than(self, ceiling: i32) -> Result<MinimumShouldMatchRequirementStep<P>> {
        if ceiling < 0 {
            return Err(PilumError::invalid_argument(format!(
                "minimumShouldMatch ceiling must be positive or zero, got {ceiling}"
            )));
        }
        Ok(MinimumShouldMatchRequirementStep {
            parent: self.parent,
            ceiling,
        })
    }
}

/// Waiting for the requirement of a ceiling.
pub struct MinimumShouldMatchRequirementStep<P> {
    parent: P,
    ceiling: i32,
}

impl<P: MinimumShouldMatchParent> MinimumShouldMatchRequirementStep<P> {
    /// Require an absolute number of matching clauses.
    pub fn then_require_number(self, n: i32) -> Result<MinimumShouldMatchMoreStep<P>> {
        self.require(MinimumShouldMatchRequirement::Number(n))
    }

    /// Require a percentage of matching clauses.
    pub fn then_require_percent(self, p: i32) -> Result<MinimumShouldMatchMoreStep<P>> {
        self.require(MinimumShouldMatchRequirement::Percent(p))
    }

    fn require(
        mut self,
        requirement: MinimumShouldMatchRequirement,
    ) -> Result<MinimumShouldMatchMoreStep<P>> {
        self.parent
            .minimum_should_match_builder()
            .minimum_should_match(self.ceiling, requirement)?;
        Ok(MinimumShouldMatchMoreStep {
            parent: self.parent,
        })
    }
}

/// A bracket was added; add another or go back to the parent.
pub struct MinimumShouldMatchMoreStep<P> {
    parent: P,
}

impl<P: MinimumShouldMatchParent> MinimumShouldMatchMoreStep<P> {
    /// Add another bracket.
    pub fn if_more_than(self, ceiling: i32) -> Result<MinimumShouldMatchRequirementStep<P>> {
        MinimumShouldMatchConditionStep {
            parent: self.parent,
        }
        .if_more_than(ceiling)
    }

    /// Go back to the parent step.
    pub fn end(self) -> P {
        self.parent
    }
}

impl<P: MinimumShouldMatchParent + PredicateFinalStep> PredicateFinalStep
    for MinimumShouldMatchMoreStep<P>
{
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.parent.to_predicate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::SearchPredicateFactory;
    use crate::schema::IndexSchema;

    #[test]
    fn test_brackets_resolve_at_build() {
        let schema = IndexSchema::builder().text("title").build().unwrap();
        let f = SearchPredicateFactory::new(&schema);

        let mut step = f.bool();
        for term in ["a", "b", "c", "d"] {
            step = step
                .should(f.match_().field("title").unwrap().matching(term))
                .unwrap();
        }

        let predicate = step
            .minimum_should_match()
            .if_more_than(2)
            .unwrap()
            .then_require_number(-1)
            .unwrap()
            .if_more_than(5)
            .unwrap()
            .then_require_percent(50)
            .unwrap()
            .end()
            .to_predicate()
            .unwrap();

        assert_eq!(predicate.as_boolean().unwrap().minimum_should_match(), Some(3));
    }

    #[test]
    fn test_negative_ceiling_rejected_eagerly() {
        let schema = IndexSchema::builder().text("title").build().unwrap();
        let f = SearchPredicateFactory::new(&schema);

        assert!(f.bool().minimum_should_match().if_more_than(-1).is_err());
    }

    #[test]
    fn test_duplicate_ceiling_rejected() {
        let schema = IndexSchema::builder().text("title").build().unwrap();
        let f = SearchPredicateFactory::new(&schema);

        let result = f
            .bool()
            .minimum_should_match()
            .if_more_than(1)
            .unwrap()
            .then_require_number(1)
            .unwrap()
            .if_more_than(1)
            .unwrap()
            .then_require_number(2);
        assert!(result.is_err());
    }
}
