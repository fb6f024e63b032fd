//! Named predicates and query parameters.
//!
//! A named predicate is a reusable predicate registered on an object field of
//! the schema (or on the root). It is built on demand by a
//! [`NamedPredicateProvider`], which receives a factory rooted at the object
//! and the parameters of the call.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::dsl::PredicateFinalStep;
use crate::dsl::factory::SearchPredicateFactory;
use crate::error::{PilumError, Result};
use crate::query::predicate::SearchPredicate;
use crate::value::FieldValue;

/// Parameters passed to named predicates or to a whole query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    values: BTreeMap<String, FieldValue>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value.
    pub fn insert<K, V>(&mut self, name: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Get a parameter or fail with an error naming it.
    pub fn required(&self, name: &str) -> Result<&FieldValue> {
        self.get(name)
            .ok_or_else(|| PilumError::invalid_argument(format!("missing required parameter '{name}'")))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Builds a named predicate.
pub trait NamedPredicateProvider: Send + Sync {
    fn create(&self, context: &NamedPredicateContext<'_>) -> Result<SearchPredicate>;
}

impl<F> NamedPredicateProvider for F
where
    F: Fn(&NamedPredicateContext<'_>) -> Result<SearchPredicate> + Send + Sync,
{
    fn create(&self, context: &NamedPredicateContext<'_>) -> Result<SearchPredicate> {
        self(context)
    }
}

/// Wrap a closure into a provider ready to be registered on a schema.
pub fn named_predicate_fn<F>(provider: F) -> Arc<dyn NamedPredicateProvider>
where
    F: Fn(&NamedPredicateContext<'_>) -> Result<SearchPredicate> + Send + Sync + 'static,
{
    Arc::new(provider)
}

/// What a provider sees when it is asked for a predicate.
pub struct NamedPredicateContext<'s> {
    factory: SearchPredicateFactory<'s>,
    params: QueryParameters,
}

impl<'s> NamedPredicateContext<'s> {
    /// A factory resolving field paths relative to the object the predicate
    /// is registered on.
    pub fn factory(&self) -> &SearchPredicateFactory<'s> {
        &self.factory
    }

    /// Parameter of the call, falling back to query-level parameters.
    pub fn param(&self, name: &str) -> Option<&FieldValue> {
        self.params
            .get(name)
            .or_else(|| self.factory.parameters().get(name))
    }

    pub fn required_param(&self, name: &str) -> Result<&FieldValue> {
        self.param(name)
            .ok_or_else(|| PilumError::invalid_argument(format!("missing required parameter '{name}'")))
    }
}

/// Parameters of a named predicate call.
pub struct NamedPredicateOptionsStep<'s> {
    path: String,
    provider: Arc<dyn NamedPredicateProvider>,
    context: NamedPredicateContext<'s>,
}

impl<'s> NamedPredicateOptionsStep<'s> {
    pub(crate) fn new(
        path: String,
        provider: Arc<dyn NamedPredicateProvider>,
        factory: SearchPredicateFactory<'s>,
    ) -> Self {
        NamedPredicateOptionsStep {
            path,
            provider,
            context: NamedPredicateContext {
                factory,
                params: QueryParameters::new(),
            },
        }
    }

    pub fn param<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.context.params.insert(name, value);
        self
    }
}

impl PredicateFinalStep for NamedPredicateOptionsStep<'_> {
    fn to_predicate(self) -> Result<SearchPredicate> {
        debug!(
            named = %self.path,
            params = self.context.params.len(),
            "creating named predicate"
        );
        self.provider.create(&self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IndexSchema;

    struct RecentProvider;

    impl NamedPredicateProvider for RecentProvider {
        fn create(&self, context: &NamedPredicateContext<'_>) -> Result<SearchPredicate> {
            let since = context
                .required_param("since")?
                .as_integer()
                .ok_or_else(|| PilumError::invalid_argument("'since' must be an integer"))?;
            context
                .factory()
                .range()
                .field("year")?
                .at_least(since)
                .to_predicate()
        }
    }

    fn schema() -> IndexSchema {
        let mut schema = IndexSchema::builder()
            .text("title")
            .object("book", false)
            .integer("book.year")
            .text("book.title")
            .build()
            .unwrap();
        schema
            .add_named_predicate("book.recent", Arc::new(RecentProvider))
            .unwrap();
        schema
            .add_named_predicate(
                "about",
                named_predicate_fn(|context| {
                    let topic = context
                        .param("topic")
                        .and_then(FieldValue::as_text)
                        .unwrap_or("rust")
                        .to_string();
                    context
                        .factory()
                        .match_()
                        .field("title")?
                        .matching(topic)
                        .to_predicate()
                }),
            )
            .unwrap();
        schema
    }

    #[test]
    fn test_named_predicate_resolves_relative_fields() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .named("book.recent")
            .unwrap()
            .param("since", 2020)
            .to_predicate()
            .unwrap();
        assert_eq!(predicate.to_string(), "book.year:[2020 TO *}");
    }

    #[test]
    fn test_named_predicate_parameters() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let missing = f.named("book.recent").unwrap().to_predicate();
        assert!(matches!(missing, Err(PilumError::InvalidArgument(_))));

        let from_query = f
            .with_param("since", 1999)
            .named("book.recent")
            .unwrap()
            .to_predicate()
            .unwrap();
        assert_eq!(from_query.to_string(), "book.year:[1999 TO *}");

        let closure = f.named("about").unwrap().to_predicate().unwrap();
        assert_eq!(closure.to_string(), "title:rust");
    }

    #[test]
    fn test_unknown_named_predicate() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        match f.named("book.missing") {
            Err(PilumError::UnknownNamedPredicate(path)) => assert_eq!(path, "book.missing"),
            Err(other) => panic!("Expected unknown named predicate, got {other:?}"),
            Ok(_) => panic!("Expected unknown named predicate"),
        }
    }
}
