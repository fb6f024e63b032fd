//! `exists()` steps.

use crate::dsl::PredicateFinalStep;
use crate::dsl::common::absolute_path;
use crate::error::Result;
use crate::query::exists::ExistsPredicateBuilder;
use crate::query::predicate::SearchPredicate;
use crate::query::query::SearchPredicateBuilder;
use crate::scope::{SearchIndexScope, keys};

pub struct ExistsPredicateFieldStep<'s> {
    scope: &'s dyn SearchIndexScope,
    root: Option<String>,
}

impl<'s> ExistsPredicateFieldStep<'s> {
    pub(crate) fn new(scope: &'s dyn SearchIndexScope, root: Option<String>) -> Self {
        ExistsPredicateFieldStep { scope, root }
    }

    /// Match documents with at least one value for the field.
    pub fn field(self, path: &str) -> Result<ExistsPredicateOptionsStep> {
        let path = absolute_path(self.root.as_deref(), path);
        let builder = self.scope.field_query_element(&path, keys::EXISTS)?;
        Ok(ExistsPredicateOptionsStep { builder })
    }
}

pub struct ExistsPredicateOptionsStep {
    builder: ExistsPredicateBuilder,
}

impl ExistsPredicateOptionsStep {
    pub fn boost(mut self, boost: f32) -> Self {
        self.builder.boost(boost);
        self
    }

    pub fn constant_score(mut self) -> Self {
        self.builder.constant_score();
        self
    }
}

impl PredicateFinalStep for ExistsPredicateOptionsStep {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self.builder.build()
    }
}
