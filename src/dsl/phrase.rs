//! `phrase()` steps.

use crate::dsl::common::{MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::Result;
use crate::query::phrase::PhrasePredicateBuilder;

pub type PhrasePredicateFieldStep<'s> = MultiFieldStep<'s, PhrasePredicateBuilder>;
pub type PhrasePredicateFieldMoreStep<'s> = MultiFieldMoreStep<'s, PhrasePredicateBuilder>;
pub type PhrasePredicateOptionsStep<'s> = MultiFieldOptionsStep<'s, PhrasePredicateBuilder>;

impl<'s> MultiFieldMoreStep<'s, PhrasePredicateBuilder> {
    /// Match documents containing the phrase.
    pub fn matching(mut self, phrase: &str) -> Result<PhrasePredicateOptionsStep<'s>> {
        let state = self.state_mut();
        state.resolve_pending()?;
        state.for_each_builder(|builder| builder.phrase(phrase));
        Ok(self.into_options())
    }
}

impl<'s> MultiFieldOptionsStep<'s, PhrasePredicateBuilder> {
    /// Allow terms to move by up to `slop` positions.
    pub fn slop(mut self, slop: i32) -> Result<Self> {
        self.state_mut()
            .try_for_each_builder(|builder| builder.slop(slop))?;
        Ok(self)
    }

    /// Override the analyzer of every field.
    pub fn analyzer(mut self, analyzer: &str) -> Self {
        self.state_mut()
            .for_each_builder(|builder| builder.analyzer(analyzer));
        self
    }

    /// Match the phrase as-is, without analysis.
    pub fn skip_analysis(mut self) -> Self {
        self.state_mut()
            .for_each_builder(PhrasePredicateBuilder::skip_analysis);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
    use crate::error::PilumError;
    use crate::schema::IndexSchema;

    #[test]
    fn test_phrase_slop() {
        let schema = IndexSchema::builder().text("body").build().unwrap();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .phrase()
            .field("body")
            .unwrap()
            .matching("quick fox")
            .unwrap()
            .slop(1)
            .to_predicate()
            .unwrap();
        assert_eq!(predicate.to_string(), "body:\"quick fox\"~1");

        let invalid = f
            .phrase()
            .field("body")
            .unwrap()
            .matching("quick fox")
            .unwrap()
            .slop(-2);
        assert!(matches!(invalid, Err(PilumError::InvalidSlop(-2))));
    }
}
