//! `match_all()` step.

use crate::dsl::PredicateFinalStep;
use crate::dsl::factory::SearchPredicateFactory;
use crate::error::Result;
use crate::query::boolean::BooleanPredicateBuilder;
use crate::query::match_all::MatchAllPredicateBuilder;
use crate::query::predicate::{ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;

/// Matches every document, except those matching `except(...)` clauses.
///
/// The boolean wrapper is only created by the first `except` call.
pub struct MatchAllPredicateOptionsStep<'s> {
    factory: SearchPredicateFactory<'s>,
    except: Option<BooleanPredicateBuilder>,
    score: ScoreOptions,
}

impl<'s> MatchAllPredicateOptionsStep<'s> {
    pub(crate) fn new(factory: SearchPredicateFactory<'s>) -> Self {
        MatchAllPredicateOptionsStep {
            factory,
            except: None,
            score: ScoreOptions::default(),
        }
    }

    /// Exclude documents matching the predicate.
    pub fn except(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        let predicate = clause.to_predicate()?;
        let scope = self.factory.scope();
        let boolean = self.except.get_or_insert_with(|| {
            let mut boolean = scope.new_boolean_builder();
            boolean.must(SearchPredicate::match_all());
            boolean
        });
        boolean.must_not(predicate);
        Ok(self)
    }

    /// Exclude documents matching a predicate built from the factory.
    pub fn except_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.except(predicate)
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.score.boost = Some(boost);
        self
    }

    pub fn constant_score(mut self) -> Self {
        self.score.constant_score = true;
        self
    }
}

impl PredicateFinalStep for MatchAllPredicateOptionsStep<'_> {
    fn to_predicate(self) -> Result<SearchPredicate> {
        match self.except {
            Some(boolean) => apply_score(boolean, self.score).build(),
            None => apply_score(MatchAllPredicateBuilder::new(), self.score).build(),
        }
    }
}

fn apply_score<B: SearchPredicateBuilder>(mut builder: B, score: ScoreOptions) -> B {
    if let Some(boost) = score.boost {
        builder.boost(boost);
    }
    if score.constant_score {
        builder.constant_score();
    }
    builder
}

#[cfg(test)]
mod tests {
    use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
    use crate::query::predicate::SearchPredicate;
    use crate::schema::IndexSchema;

    #[test]
    fn test_match_all_except() {
        let schema = IndexSchema::builder().text("title").build().unwrap();
        let f = SearchPredicateFactory::new(&schema);

        let all = f.match_all().to_predicate().unwrap();
        assert_eq!(all, SearchPredicate::match_all());

        let except = f
            .match_all()
            .except(f.match_().field("title").unwrap().matching("draft"))
            .unwrap()
            .except_with(|f| f.match_().field("title").unwrap().matching("spam"))
            .unwrap()
            .to_predicate()
            .unwrap();
        assert_eq!(except.to_string(), "+*:* -title:draft -title:spam");

        let boosted = f
            .match_all()
            .boost(2.0)
            .except(f.match_().field("title").unwrap().matching("draft"))
            .unwrap()
            .to_predicate()
            .unwrap();
        assert_eq!(boosted.to_string(), "(+*:* -title:draft)^2.0");

        assert_eq!(f.match_none().to_string(), "MatchNoDocs");
    }
}
