//! The entry point of the predicate DSL.

use std::sync::Arc;

use tracing::debug;

use crate::dsl::PredicateFinalStep;
use crate::dsl::boolean::{
    BooleanPredicateClausesStep, SimpleBooleanOperator, SimpleBooleanPredicateClausesStep,
};
use crate::dsl::common::{MultiFieldStep, absolute_path};
use crate::dsl::exists::ExistsPredicateFieldStep;
use crate::dsl::id::IdPredicateMatchingStep;
use crate::dsl::knn::KnnPredicateFieldStep;
use crate::dsl::match_all::MatchAllPredicateOptionsStep;
use crate::dsl::matching::MatchPredicateFieldStep;
use crate::dsl::named::{NamedPredicateOptionsStep, QueryParameters};
use crate::dsl::nested::NestedPredicateClausesStep;
use crate::dsl::not::NotPredicateFinalStep;
use crate::dsl::phrase::PhrasePredicateFieldStep;
use crate::dsl::query_string::{
    FullQueryStringPredicateFieldStep, QueryStringPredicateFieldStep,
    SimpleQueryStringPredicateFieldStep,
};
use crate::dsl::range::RangePredicateFieldStep;
use crate::dsl::regexp::RegexpPredicateFieldStep;
use crate::dsl::spatial::SpatialPredicateInitialStep;
use crate::dsl::terms::TermsPredicateFieldStep;
use crate::dsl::wildcard::{PrefixPredicateFieldStep, WildcardPredicateFieldStep};
use crate::error::{PilumError, Result};
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;
use crate::scope::{PredicateTypeKey, SearchIndexScope, keys};
use crate::value::FieldValue;

/// Creates predicates against a search scope.
///
/// Every method allocates fresh state, so a factory can be reused for any
/// number of predicates. Field paths are resolved relative to the factory
/// root, which is empty unless the factory was obtained from
/// [`SearchPredicateFactory::with_root`] or handed to a named predicate.
#[derive(Clone)]
pub struct SearchPredicateFactory<'s> {
    scope: &'s dyn SearchIndexScope,
    root: Option<String>,
    params: Arc<QueryParameters>,
}

impl std::fmt::Debug for SearchPredicateFactory<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPredicateFactory")
            .field("root", &self.root)
            .field("params", &self.params)
            .finish()
    }
}

impl<'s> SearchPredicateFactory<'s> {
    /// Create a factory over a scope.
    pub fn new(scope: &'s dyn SearchIndexScope) -> Self {
        SearchPredicateFactory {
            scope,
            root: None,
            params: Arc::new(QueryParameters::new()),
        }
    }

    pub fn scope(&self) -> &'s dyn SearchIndexScope {
        self.scope
    }

    /// Object path field paths are relative to.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Query-level parameters.
    pub fn parameters(&self) -> &QueryParameters {
        &self.params
    }

    /// A factory resolving field paths relative to an object path.
    pub fn with_root(&self, object_path: &str) -> Self {
        let root = absolute_path(self.root(), object_path);
        SearchPredicateFactory {
            scope: self.scope,
            root: if root.is_empty() { None } else { Some(root) },
            params: Arc::clone(&self.params),
        }
    }

    /// A factory carrying one more query-level parameter.
    pub fn with_param<K, V>(&self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut params = QueryParameters::clone(&self.params);
        params.insert(name, value);
        SearchPredicateFactory {
            scope: self.scope,
            root: self.root.clone(),
            params: Arc::new(params),
        }
    }

    /// Build a predicate that depends on the query-level parameters.
    pub fn with_parameters<F, R>(&self, build: F) -> R
    where
        F: FnOnce(&SearchPredicateFactory<'s>, &QueryParameters) -> R,
    {
        build(self, &self.params)
    }

    fn field_step<B: SearchPredicateBuilder>(&self, key: PredicateTypeKey<B>) -> MultiFieldStep<'s, B> {
        MultiFieldStep::new(self.scope, key, self.root.clone())
    }

    /// Match a value, optionally with fuzziness.
    pub fn match_(&self) -> MatchPredicateFieldStep<'s> {
        self.field_step(keys::MATCH)
    }

    /// Match values within a range.
    pub fn range(&self) -> RangePredicateFieldStep<'s> {
        self.field_step(keys::RANGE)
    }

    /// Match a sequence of terms.
    pub fn phrase(&self) -> PhrasePredicateFieldStep<'s> {
        self.field_step(keys::PHRASE)
    }

    /// Match a pattern with `*` and `?` wildcards.
    pub fn wildcard(&self) -> WildcardPredicateFieldStep<'s> {
        self.field_step(keys::WILDCARD)
    }

    /// Match terms starting with a prefix.
    pub fn prefix(&self) -> PrefixPredicateFieldStep<'s> {
        self.field_step(keys::PREFIX)
    }

    /// Match terms against a regular expression.
    pub fn regexp(&self) -> RegexpPredicateFieldStep<'s> {
        self.field_step(keys::REGEXP)
    }

    /// Match any or all of a set of terms.
    pub fn terms(&self) -> TermsPredicateFieldStep<'s> {
        self.field_step(keys::TERMS)
    }

    /// Match documents with a value for a field.
    pub fn exists(&self) -> ExistsPredicateFieldStep<'s> {
        ExistsPredicateFieldStep::new(self.scope, self.root.clone())
    }

    /// Match geo points within a shape.
    pub fn spatial(&self) -> SpatialPredicateInitialStep<'s> {
        SpatialPredicateInitialStep::new(self.scope, self.root.clone())
    }

    pub fn simple_query_string(&self) -> SimpleQueryStringPredicateFieldStep<'s> {
        QueryStringPredicateFieldStep::new(self.scope, self.root.clone())
    }

    pub fn query_string(&self) -> FullQueryStringPredicateFieldStep<'s> {
        QueryStringPredicateFieldStep::new(self.scope, self.root.clone())
    }

    /// Match the `k` nearest neighbors of a vector.
    pub fn knn(&self, k: usize) -> Result<KnnPredicateFieldStep<'s>> {
        if k == 0 {
            return Err(PilumError::invalid_argument(
                "knn requires k to be strictly positive",
            ));
        }
        Ok(KnnPredicateFieldStep::new(self.clone(), k))
    }

    /// Match documents whose nested objects at `path` match every clause.
    pub fn nested(&self, path: &str) -> Result<NestedPredicateClausesStep<'s>> {
        let path = absolute_path(self.root(), path);
        let builder = self.scope.field_query_element(&path, keys::NESTED)?;
        Ok(NestedPredicateClausesStep::new(self.clone(), builder))
    }

    /// Combine clauses with must/should/must-not/filter occurrences.
    pub fn bool(&self) -> BooleanPredicateClausesStep<'s> {
        BooleanPredicateClausesStep::new(self.clone())
    }

    /// Conjunction of clauses.
    pub fn and(&self) -> SimpleBooleanPredicateClausesStep<'s> {
        SimpleBooleanPredicateClausesStep::new(self.clone(), SimpleBooleanOperator::And)
    }

    /// Disjunction of clauses.
    pub fn or(&self) -> SimpleBooleanPredicateClausesStep<'s> {
        SimpleBooleanPredicateClausesStep::new(self.clone(), SimpleBooleanOperator::Or)
    }

    /// Negate a predicate.
    pub fn not(&self, clause: impl PredicateFinalStep) -> Result<NotPredicateFinalStep> {
        let negated = clause.to_predicate()?;
        Ok(NotPredicateFinalStep::new(
            self.scope.new_boolean_builder(),
            negated,
        ))
    }

    pub fn match_all(&self) -> MatchAllPredicateOptionsStep<'s> {
        MatchAllPredicateOptionsStep::new(self.clone())
    }

    pub fn match_none(&self) -> SearchPredicate {
        SearchPredicate::match_none()
    }

    /// Match documents by identifier.
    pub fn id(&self) -> IdPredicateMatchingStep {
        IdPredicateMatchingStep::new()
    }

    /// Call a named predicate registered as `objectPath.name`.
    pub fn named(&self, path: &str) -> Result<NamedPredicateOptionsStep<'s>> {
        let path = absolute_path(self.root(), path);
        let provider = self
            .scope
            .named_predicate(&path)
            .ok_or_else(|| PilumError::UnknownNamedPredicate(path.clone()))?;

        let factory = SearchPredicateFactory {
            scope: self.scope,
            root: path
                .rsplit_once('.')
                .map(|(object_path, _)| object_path.to_string()),
            params: Arc::clone(&self.params),
        };
        debug!(named = %path, root = ?factory.root, "resolved named predicate");
        Ok(NamedPredicateOptionsStep::new(path, provider, factory))
    }
}
