//! `nested()` step.

use crate::dsl::PredicateFinalStep;
use crate::dsl::factory::SearchPredicateFactory;
use crate::error::{PilumError, Result};
use crate::query::boolean::BooleanPredicateBuilder;
use crate::query::nested::NestedPredicateBuilder;
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;

/// Predicates that nested documents of one object field must all match.
pub struct NestedPredicateClausesStep<'s> {
    factory: SearchPredicateFactory<'s>,
    nested: NestedPredicateBuilder,
    inner: BooleanPredicateBuilder,
}

impl<'s> NestedPredicateClausesStep<'s> {
    pub(crate) fn new(factory: SearchPredicateFactory<'s>, nested: NestedPredicateBuilder) -> Self {
        let inner = factory.scope().new_boolean_builder();
        NestedPredicateClausesStep {
            factory,
            nested,
            inner,
        }
    }

    /// Add a predicate nested documents must match. Every field it targets
    /// must belong to the nested object.
    pub fn add(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        let predicate = clause.to_predicate()?;
        let prefix = format!("{}.", self.nested.path());
        if let Some(outside) = predicate.fields().into_iter().find(|f| !f.starts_with(&prefix)) {
            return Err(PilumError::invalid_argument(format!(
                "field '{outside}' is not within nested object '{}'",
                self.nested.path()
            )));
        }
        self.inner.must(predicate);
        Ok(self)
    }

    /// Add a predicate built from the factory.
    pub fn add_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.add(predicate)
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.nested.boost(boost);
        self
    }

    pub fn constant_score(mut self) -> Self {
        self.nested.constant_score();
        self
    }
}

impl PredicateFinalStep for NestedPredicateClausesStep<'_> {
    fn to_predicate(mut self) -> Result<SearchPredicate> {
        self.nested.nested(self.inner.build()?);
        self.nested.build()
    }
}

#[cfg(test)]
mod tests {
    use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
    use crate::error::PilumError;
    use crate::schema::IndexSchema;

    fn schema() -> IndexSchema {
        IndexSchema::builder()
            .text("title")
            .object("authors", true)
            .text("authors.name")
            .integer("authors.birth_year")
            .object("publisher", false)
            .text("publisher.name")
            .build()
            .unwrap()
    }

    #[test]
    fn test_nested_clauses() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .nested("authors")
            .unwrap()
            .add(f.match_().field("authors.name").unwrap().matching("ada"))
            .unwrap()
            .add_with(|f| f.range().field("authors.birth_year").unwrap().at_most(1900))
            .unwrap()
            .to_predicate()
            .unwrap();
        assert_eq!(
            predicate.to_string(),
            "Nested(authors: +authors.name:ada +authors.birth_year:{* TO 1900])"
        );
    }

    #[test]
    fn test_nested_rejects_outside_fields() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let result = f
            .nested("authors")
            .unwrap()
            .add(f.match_().field("title").unwrap().matching("rust"));
        assert!(matches!(result, Err(PilumError::InvalidArgument(_))));
    }

    #[test]
    fn test_nested_requires_nested_object() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        assert!(matches!(
            f.nested("publisher"),
            Err(PilumError::UnsupportedPredicate { .. })
        ));
    }
}
