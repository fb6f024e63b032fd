//! `wildcard()` and `prefix()` steps.

use crate::dsl::common::{MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::Result;
use crate::query::prefix::PrefixPredicateBuilder;
use crate::query::wildcard::WildcardPredicateBuilder;

pub type WildcardPredicateFieldStep<'s> = MultiFieldStep<'s, WildcardPredicateBuilder>;
pub type WildcardPredicateFieldMoreStep<'s> = MultiFieldMoreStep<'s, WildcardPredicateBuilder>;
pub type WildcardPredicateOptionsStep<'s> = MultiFieldOptionsStep<'s, WildcardPredicateBuilder>;

pub type PrefixPredicateFieldStep<'s> = MultiFieldStep<'s, PrefixPredicateBuilder>;
pub type PrefixPredicateFieldMoreStep<'s> = MultiFieldMoreStep<'s, PrefixPredicateBuilder>;
pub type PrefixPredicateOptionsStep<'s> = MultiFieldOptionsStep<'s, PrefixPredicateBuilder>;

impl<'s> MultiFieldMoreStep<'s, WildcardPredicateBuilder> {
    /// Match terms against the pattern; `*` matches any sequence, `?` one character.
    pub fn matching(mut self, pattern: &str) -> Result<WildcardPredicateOptionsStep<'s>> {
        let state = self.state_mut();
        state.resolve_pending()?;
        state.try_for_each_builder(|builder| builder.pattern(pattern))?;
        Ok(self.into_options())
    }
}

impl<'s> MultiFieldMoreStep<'s, PrefixPredicateBuilder> {
    /// Match terms starting with the prefix.
    pub fn matching(mut self, prefix: &str) -> Result<PrefixPredicateOptionsStep<'s>> {
        let state = self.state_mut();
        state.resolve_pending()?;
        state.for_each_builder(|builder| builder.prefix(prefix));
        Ok(self.into_options())
    }
}

#[cfg(test)]
mod tests {
    use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
    use crate::schema::IndexSchema;

    #[test]
    fn test_wildcard_and_prefix() {
        let schema = IndexSchema::builder().keyword("code").build().unwrap();
        let f = SearchPredicateFactory::new(&schema);

        let wildcard = f
            .wildcard()
            .field("code")
            .unwrap()
            .matching("ab?d*")
            .to_predicate()
            .unwrap();
        assert_eq!(wildcard.to_string(), "code:ab?d*");

        let prefix = f
            .prefix()
            .field("code")
            .unwrap()
            .matching("ab")
            .unwrap()
            .boost(2.0)
            .to_predicate()
            .unwrap();
        assert_eq!(prefix.to_string(), "(code:ab*)^2.0");
    }
}
