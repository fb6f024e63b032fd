//! `match()` steps.

use crate::dsl::common::{MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::Result;
use crate::query::matching::MatchPredicateBuilder;
use crate::value::FieldValue;

pub type MatchPredicateFieldStep<'s> = MultiFieldStep<'s, MatchPredicateBuilder>;
pub type MatchPredicateFieldMoreStep<'s> = MultiFieldMoreStep<'s, MatchPredicateBuilder>;
pub type MatchPredicateOptionsStep<'s> = MultiFieldOptionsStep<'s, MatchPredicateBuilder>;

impl<'s> MultiFieldMoreStep<'s, MatchPredicateBuilder> {
    /// Match documents whose fields match the value.
    pub fn matching<V: Into<FieldValue>>(mut self, value: V) -> Result<MatchPredicateOptionsStep<'s>> {
        let value = value.into();
        let state = self.state_mut();
        state.resolve_pending()?;
        state.try_for_each_builder(|builder| builder.value(value.clone()))?;
        Ok(self.into_options())
    }
}

impl<'s> MultiFieldOptionsStep<'s, MatchPredicateBuilder> {
    /// Enable fuzzy matching with the configured default parameters.
    pub fn fuzzy(mut self) -> Result<Self> {
        let config = self.state_mut().scope().config();
        let (distance, prefix) = (
            config.default_fuzzy_max_edit_distance,
            config.default_fuzzy_exact_prefix_length,
        );
        self.fuzzy_with(distance, prefix)
    }

    /// Enable fuzzy matching with the given maximum edit distance.
    pub fn fuzzy_with_distance(mut self, max_edit_distance: i32) -> Result<Self> {
        let prefix = self
            .state_mut()
            .scope()
            .config()
            .default_fuzzy_exact_prefix_length;
        self.fuzzy_with(max_edit_distance, prefix)
    }

    /// Enable fuzzy matching; `max_edit_distance` within `[0, 2]`,
    /// `exact_prefix_length` positive or zero.
    pub fn fuzzy_with(mut self, max_edit_distance: i32, exact_prefix_length: i32) -> Result<Self> {
        self.state_mut()
            .try_for_each_builder(|builder| builder.fuzzy(max_edit_distance, exact_prefix_length))?;
        Ok(self)
    }

    /// Override the analyzer of every field.
    pub fn analyzer(mut self, analyzer: &str) -> Result<Self> {
        self.state_mut()
            .try_for_each_builder(|builder| builder.analyzer(analyzer))?;
        Ok(self)
    }

    /// Match the value as-is, without analysis.
    pub fn skip_analysis(mut self) -> Self {
        self.state_mut()
            .for_each_builder(MatchPredicateBuilder::skip_analysis);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
    use crate::error::PilumError;
    use crate::query::predicate::PredicateKind;
    use crate::schema::IndexSchema;

    fn schema() -> IndexSchema {
        IndexSchema::builder()
            .text("title")
            .text("body")
            .integer("year")
            .build()
            .unwrap()
    }

    #[test]
    fn test_match_single_field() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .match_()
            .field("title")
            .unwrap()
            .matching("rust")
            .to_predicate()
            .unwrap();
        assert!(matches!(predicate.kind(), PredicateKind::Match { .. }));
        assert_eq!(predicate.to_string(), "title:rust");
    }

    #[test]
    fn test_match_fuzzy_on_every_field() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .match_()
            .fields(["title", "body"])
            .unwrap()
            .matching("rust")
            .unwrap()
            .fuzzy()
            .to_predicate()
            .unwrap();
        assert_eq!(predicate.to_string(), "title:rust~2 body:rust~2");
    }

    #[test]
    fn test_match_value_conversion_error() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let result = f.match_().field("year").unwrap().matching("recent");
        assert!(matches!(result, Err(PilumError::ValueConversion { .. })));
    }

    #[test]
    fn test_skip_analysis() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .match_()
            .field("title")
            .unwrap()
            .matching("Rust")
            .unwrap()
            .skip_analysis()
            .to_predicate()
            .unwrap();
        match predicate.kind() {
            PredicateKind::Match { skip_analysis, .. } => assert!(*skip_analysis),
            other => panic!("Expected match predicate, got {other:?}"),
        }
    }
}
