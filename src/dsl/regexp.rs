//! `regexp()` steps.

use crate::dsl::common::{MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::Result;
use crate::query::regexp::{RegexpPredicateBuilder, RegexpQueryFlag};

pub type RegexpPredicateFieldStep<'s> = MultiFieldStep<'s, RegexpPredicateBuilder>;
pub type RegexpPredicateFieldMoreStep<'s> = MultiFieldMoreStep<'s, RegexpPredicateBuilder>;
pub type RegexpPredicateOptionsStep<'s> = MultiFieldOptionsStep<'s, RegexpPredicateBuilder>;

impl<'s> MultiFieldMoreStep<'s, RegexpPredicateBuilder> {
    /// Match terms against the regular expression.
    pub fn matching(mut self, pattern: &str) -> Result<RegexpPredicateOptionsStep<'s>> {
        let state = self.state_mut();
        state.resolve_pending()?;
        state.for_each_builder(|builder| builder.pattern(pattern));
        Ok(self.into_options())
    }
}

impl<'s> MultiFieldOptionsStep<'s, RegexpPredicateBuilder> {
    /// Enable optional syntax.
    pub fn flags<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = RegexpQueryFlag>,
    {
        let flags: Vec<RegexpQueryFlag> = flags.into_iter().collect();
        self.state_mut()
            .for_each_builder(|builder| builder.flags(flags.iter().copied()));
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
    use crate::query::regexp::RegexpQueryFlag;
    use crate::schema::IndexSchema;

    #[test]
    fn test_regexp_with_flags() {
        let schema = IndexSchema::builder().keyword("code").build().unwrap();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .regexp()
            .field("code")
            .unwrap()
            .matching("ab<1-5>")
            .unwrap()
            .flags([RegexpQueryFlag::Interval])
            .to_predicate()
            .unwrap();
        assert_eq!(predicate.to_string(), "code:/ab<1-5>/");

        let invalid = f
            .regexp()
            .field("code")
            .unwrap()
            .matching("ab(")
            .to_predicate();
        assert!(invalid.is_err());
    }
}
