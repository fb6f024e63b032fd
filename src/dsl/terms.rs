//! `terms()` steps.

use crate::dsl::common::{MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::Result;
use crate::query::terms::TermsPredicateBuilder;
use crate::value::FieldValue;

pub type TermsPredicateFieldStep<'s> = MultiFieldStep<'s, TermsPredicateBuilder>;
pub type TermsPredicateFieldMoreStep<'s> = MultiFieldMoreStep<'s, TermsPredicateBuilder>;
pub type TermsPredicateOptionsStep<'s> = MultiFieldOptionsStep<'s, TermsPredicateBuilder>;

impl<'s> MultiFieldMoreStep<'s, TermsPredicateBuilder> {
    /// Match documents containing any of the terms.
    pub fn matching_any<I, V>(self, terms: I) -> Result<TermsPredicateOptionsStep<'s>>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.set_terms(terms.into_iter().map(Into::into).collect(), false)
    }

    /// Match documents containing all of the terms.
    pub fn matching_all<I, V>(self, terms: I) -> Result<TermsPredicateOptionsStep<'s>>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.set_terms(terms.into_iter().map(Into::into).collect(), true)
    }

    fn set_terms(mut self, terms: Vec<FieldValue>, all: bool) -> Result<TermsPredicateOptionsStep<'s>> {
        let state = self.state_mut();
        state.resolve_pending()?;
        state.try_for_each_builder(|builder| {
            if all {
                builder.matching_all(terms.clone())
            } else {
                builder.matching_any(terms.clone())
            }
        })?;
        Ok(self.into_options())
    }
}

#[cfg(test)]
mod tests {
    use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
    use crate::schema::IndexSchema;

    #[test]
    fn test_terms() {
        let schema = IndexSchema::builder()
            .keyword("tags")
            .integer("year")
            .build()
            .unwrap();
        let f = SearchPredicateFactory::new(&schema);

        let any = f
            .terms()
            .field("tags")
            .unwrap()
            .matching_any(["rust", "search"])
            .to_predicate()
            .unwrap();
        assert_eq!(any.to_string(), "tags:(rust search)");

        let all = f
            .terms()
            .field("year")
            .unwrap()
            .matching_all([2020, 2021])
            .to_predicate()
            .unwrap();
        assert_eq!(all.to_string(), "year:(+2020 +2021)");

        let empty: [&str; 0] = [];
        assert!(f.terms().field("tags").unwrap().matching_any(empty).is_err());
    }
}
