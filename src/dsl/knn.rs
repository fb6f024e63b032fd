//! `knn()` steps.

use crate::dsl::PredicateFinalStep;
use crate::dsl::common::absolute_path;
use crate::dsl::factory::SearchPredicateFactory;
use crate::error::Result;
use crate::query::boolean::BooleanPredicateBuilder;
use crate::query::knn::KnnPredicateBuilder;
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;
use crate::scope::keys;

/// Waiting for the vector field.
pub struct KnnPredicateFieldStep<'s> {
    factory: SearchPredicateFactory<'s>,
    k: usize,
}

impl<'s> KnnPredicateFieldStep<'s> {
    pub(crate) fn new(factory: SearchPredicateFactory<'s>, k: usize) -> Self {
        KnnPredicateFieldStep { factory, k }
    }

    /// Target a vector field.
    pub fn field(self, path: &str) -> Result<KnnPredicateVectorStep<'s>> {
        let path = absolute_path(self.factory.root(), path);
        let mut builder = self
            .factory
            .scope()
            .field_query_element(&path, keys::KNN)?;
        builder.k(self.k)?;
        Ok(KnnPredicateVectorStep {
            factory: self.factory,
            builder,
        })
    }
}

/// Waiting for the vector to search near.
pub struct KnnPredicateVectorStep<'s> {
    factory: SearchPredicateFactory<'s>,
    builder: KnnPredicateBuilder,
}

impl<'s> KnnPredicateVectorStep<'s> {
    /// Search near the vector; its length must match the field dimension.
    pub fn matching(mut self, vector: Vec<f32>) -> Result<KnnPredicateOptionsStep<'s>> {
        self.builder.vector(vector)?;
        Ok(KnnPredicateOptionsStep {
            factory: self.factory,
            builder: self.builder,
            filter: None,
        })
    }
}

/// Options of a knn predicate.
///
/// The filter boolean is only created by the first `filter` call.
pub struct KnnPredicateOptionsStep<'s> {
    factory: SearchPredicateFactory<'s>,
    builder: KnnPredicateBuilder,
    filter: Option<BooleanPredicateBuilder>,
}

impl<'s> KnnPredicateOptionsStep<'s> {
    /// Only consider documents matching the predicate.
    pub fn filter(mut self, clause: impl PredicateFinalStep) -> Result<Self> {
        let predicate = clause.to_predicate()?;
        let scope = self.factory.scope();
        self.filter
            .get_or_insert_with(|| scope.new_boolean_builder())
            .must(predicate);
        Ok(self)
    }

    /// Only consider documents matching a predicate built from the factory.
    pub fn filter_with<F, R>(self, clause: F) -> Result<Self>
    where
        F: FnOnce(&SearchPredicateFactory<'s>) -> R,
        R: PredicateFinalStep,
    {
        let predicate = clause(&self.factory).to_predicate()?;
        self.filter(predicate)
    }

    /// Drop neighbors less similar than the threshold.
    pub fn required_minimum_similarity(mut self, similarity: f32) -> Self {
        self.builder.required_minimum_similarity(similarity);
        self
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.builder.boost(boost);
        self
    }

    pub fn constant_score(mut self) -> Self {
        self.builder.constant_score();
        self
    }
}

impl PredicateFinalStep for KnnPredicateOptionsStep<'_> {
    fn to_predicate(mut self) -> Result<SearchPredicate> {
        if let Some(filter) = self.filter {
            self.builder.filter(filter.build()?);
        }
        self.builder.build()
    }
}
