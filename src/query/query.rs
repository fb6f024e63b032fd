//! Base builder trait shared by every predicate kind.

use std::fmt::Debug;

use crate::error::Result;
use crate::query::predicate::SearchPredicate;

/// Trait for predicate builders.
///
/// A builder owns its parameters until [`build`](Self::build) consumes it.
/// `boost` and `constant_score` are the last mutations a multi-field step
/// performs on a builder before building it.
pub trait SearchPredicateBuilder: Debug {
    /// Set the boost factor of the built predicate.
    fn boost(&mut self, boost: f32);

    /// Make the built predicate score with a constant score.
    fn constant_score(&mut self);

    /// Build the predicate.
    fn build(self) -> Result<SearchPredicate>;
}
