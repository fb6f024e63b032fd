//! `simple_query_string()` and `query_string()` steps.
//!
//! Both syntaxes share the same steps; a marker type selects the syntax and
//! which syntax-specific options are available.

use std::marker::PhantomData;

use crate::dsl::PredicateFinalStep;
use crate::dsl::common::{FieldSetState, absolute_path};
use crate::dsl::minimum_should_match::MinimumShouldMatchParent;
use crate::error::{PilumError, Result};
use crate::query::minimum_should_match::MinimumShouldMatchBuilder;
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;
use crate::query::query_string::{
    BooleanOperator, QueryStringField, QueryStringPredicateBuilder, QueryStringSyntax,
    RewriteMethod, SimpleQueryFlag,
};
use crate::scope::{PredicateTypeKey, SearchIndexScope, keys};

/// A query-string syntax.
pub trait QueryStringKind {
    const SYNTAX: QueryStringSyntax;
    const KEY: PredicateTypeKey<QueryStringField>;
}

/// Simple query-string syntax: `+`, `|`, `-`, `"…"`, `*`, `~`.
#[derive(Debug, Clone, Copy)]
pub struct Simple;

/// Full query-string syntax, with field prefixes and `AND`/`OR`/`NOT`.
#[derive(Debug, Clone, Copy)]
pub struct Full;

impl QueryStringKind for Simple {
    const SYNTAX: QueryStringSyntax = QueryStringSyntax::Simple;
    const KEY: PredicateTypeKey<QueryStringField> = keys::SIMPLE_QUERY_STRING;
}

impl QueryStringKind for Full {
    const SYNTAX: QueryStringSyntax = QueryStringSyntax::Full;
    const KEY: PredicateTypeKey<QueryStringField> = keys::QUERY_STRING;
}

pub type SimpleQueryStringPredicateFieldStep<'s> = QueryStringPredicateFieldStep<'s, Simple>;
pub type SimpleQueryStringPredicateOptionsStep = QueryStringPredicateOptionsStep<Simple>;
pub type FullQueryStringPredicateFieldStep<'s> = QueryStringPredicateFieldStep<'s, Full>;
pub type FullQueryStringPredicateOptionsStep = QueryStringPredicateOptionsStep<Full>;

/// Declares the fields a query string targets; fields resolve when the
/// query string is supplied.
pub struct QueryStringPredicateFieldStep<'s, K> {
    scope: &'s dyn SearchIndexScope,
    root: Option<String>,
    field_sets: Vec<FieldSetState<QueryStringField>>,
    _kind: PhantomData<K>,
}

impl<'s, K: QueryStringKind> QueryStringPredicateFieldStep<'s, K> {
    pub(crate) fn new(scope: &'s dyn SearchIndexScope, root: Option<String>) -> Self {
        QueryStringPredicateFieldStep {
            scope,
            root,
            field_sets: Vec::new(),
            _kind: PhantomData,
        }
    }

    /// Target one field.
    pub fn field(self, path: &str) -> Self {
        self.fields([path])
    }

    /// Target several fields sharing the same boost.
    pub fn fields<'p, I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = &'p str>,
    {
        let paths = paths
            .into_iter()
            .map(|path| absolute_path(self.root.as_deref(), path))
            .collect();
        self.field_sets.push(FieldSetState::new(paths));
        self
    }

    /// Boost the fields of the last `field(...)`/`fields(...)` call.
    pub fn boost(mut self, boost: f32) -> Self {
        if let Some(field_set) = self.field_sets.last_mut() {
            field_set.set_boost(boost);
        }
        self
    }

    /// Supply the query string, resolving every declared field.
    pub fn matching(self, query: &str) -> Result<QueryStringPredicateOptionsStep<K>> {
        let mut fields = Vec::new();
        for mut field_set in self.field_sets {
            if field_set.paths().is_empty() {
                return Err(PilumError::invalid_argument(format!(
                    "a field set of a {} predicate needs at least one field",
                    K::KEY.name()
                )));
            }
            field_set.resolve(self.scope, K::KEY)?;
            let boost = field_set.boost();
            fields.extend(field_set.into_builders().into_iter().map(|mut field| {
                field.boost = boost;
                field
            }));
        }
        if fields.is_empty() {
            return Err(PilumError::NoFieldSet);
        }

        let mut builder = QueryStringPredicateBuilder::new(K::SYNTAX, fields);
        builder.query(query);
        Ok(QueryStringPredicateOptionsStep {
            builder,
            _kind: PhantomData,
        })
    }
}

/// Options of a query-string predicate.
pub struct QueryStringPredicateOptionsStep<K> {
    builder: QueryStringPredicateBuilder,
    _kind: PhantomData<K>,
}

impl<K: QueryStringKind> QueryStringPredicateOptionsStep<K> {
    /// Operator between terms without an explicit one.
    pub fn default_operator(mut self, operator: BooleanOperator) -> Self {
        self.builder.default_operator(operator);
        self
    }

    pub fn analyzer(mut self, analyzer: &str) -> Self {
        self.builder.analyzer(analyzer);
        self
    }

    pub fn skip_analysis(mut self) -> Self {
        self.builder.skip_analysis();
        self
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.builder.boost(boost);
        self
    }

    /// Score with a constant score; rejected when a field carries a boost.
    pub fn constant_score(mut self) -> Result<Self> {
        if let Some(boost) = self.builder.field_boost() {
            return Err(PilumError::ContradictoryBoost { boost });
        }
        self.builder.constant_score();
        Ok(self)
    }
}

impl QueryStringPredicateOptionsStep<Simple> {
    /// Restrict the operators recognized in the query string.
    pub fn flags<I>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = SimpleQueryFlag>,
    {
        self.builder.flags(flags);
        self
    }
}

impl QueryStringPredicateOptionsStep<Full> {
    /// Slop of phrases without an explicit one.
    pub fn phrase_slop(mut self, slop: i32) -> Result<Self> {
        self.builder.phrase_slop(slop)?;
        Ok(self)
    }

    pub fn allow_leading_wildcard(mut self, allow: bool) -> Self {
        self.builder.allow_leading_wildcard(allow);
        self
    }

    pub fn enable_position_increments(mut self, enable: bool) -> Self {
        self.builder.enable_position_increments(enable);
        self
    }

    /// Rewrite method without a parameter.
    pub fn rewrite_method(mut self, method: RewriteMethod) -> Result<Self> {
        self.builder.rewrite_method(method, None)?;
        Ok(self)
    }

    /// Rewrite method taking the number of top terms.
    pub fn rewrite_method_with(mut self, method: RewriteMethod, n: i32) -> Result<Self> {
        self.builder.rewrite_method(method, Some(n))?;
        Ok(self)
    }
}

impl<K: QueryStringKind> MinimumShouldMatchParent for QueryStringPredicateOptionsStep<K> {
    fn minimum_should_match_builder(&mut self) -> &mut dyn MinimumShouldMatchBuilder {
        &mut self.builder
    }
}

impl<K: QueryStringKind> PredicateFinalStep for QueryStringPredicateOptionsStep<K> {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::SearchPredicateFactory;
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
    fn test_simple_query_string() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .simple_query_string()
            .field("title")
            .boost(2.0)
            .field("body")
            .matching("rust -java")
            .unwrap()
            .default_operator(BooleanOperator::And)
            .flags([SimpleQueryFlag::And, SimpleQueryFlag::Not])
            .to_predicate()
            .unwrap();
        assert_eq!(
            predicate.to_string(),
            "SimpleQueryString([title^2.0, body] 'rust -java' AND)"
        );
    }

    #[test]
    fn test_query_string_options() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        let predicate = f
            .query_string()
            .fields(["title", "body"])
            .matching("title:rust AND body:search")
            .unwrap()
            .phrase_slop(2)
            .unwrap()
            .rewrite_method_with(RewriteMethod::TopTermsBoostN, 10)
            .unwrap()
            .minimum_should_match_percent(50)
            .to_predicate()
            .unwrap();
        match predicate.kind() {
            PredicateKind::QueryString(qs) => {
                assert_eq!(qs.phrase_slop(), Some(2));
                assert_eq!(qs.rewrite().map(|r| r.size), Some(Some(10)));
                assert!(!qs.minimum_should_match().is_empty());
            }
            other => panic!("Expected query string, got {other:?}"),
        }
    }

    #[test]
    fn test_query_string_errors() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);

        assert!(matches!(
            f.query_string().field("year").matching("2020"),
            Err(PilumError::UnsupportedPredicate { .. })
        ));
        assert!(matches!(
            f.query_string()
                .field("title")
                .matching("rust")
                .unwrap()
                .rewrite_method(RewriteMethod::TopTermsN),
            Err(PilumError::RewriteMethodMismatch { .. })
        ));
        assert!(matches!(
            f.simple_query_string()
                .field("title")
                .boost(2.0)
                .matching("rust")
                .unwrap()
                .constant_score(),
            Err(PilumError::ContradictoryBoost { .. })
        ));
        assert!(matches!(
            f.simple_query_string()
                .field("title")
                .fields(Vec::<&str>::new())
                .boost(2.0)
                .matching("rust"),
            Err(PilumError::InvalidArgument(_))
        ));
    }
}
