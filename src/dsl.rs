//! The fluent predicate DSL.
//!
//! Entry point is [`SearchPredicateFactory`]. Each factory method allocates
//! fresh state; steps are consumed by value so a chain can only move
//! forward, and every step that can end a chain implements
//! [`PredicateFinalStep`].
//!
//! ```
//! use pilum::dsl::{PredicateFinalStep, SearchPredicateFactory};
//! use pilum::schema::IndexSchema;
//!
//! let schema = IndexSchema::builder().text("title").integer("year").build().unwrap();
//! let f = SearchPredicateFactory::new(&schema);
//!
//! let predicate = f
//!     .bool()
//!     .must(f.match_().field("title").unwrap().matching("rust"))
//!     .unwrap()
//!     .filter(f.range().field("year").unwrap().at_least(2020))
//!     .unwrap()
//!     .to_predicate()
//!     .unwrap();
//!
//! assert_eq!(predicate.to_string(), "+title:rust #year:[2020 TO *}");
//! ```

pub mod boolean;
pub mod common;
pub mod exists;
pub mod factory;
pub mod id;
pub mod knn;
pub mod match_all;
pub mod matching;
pub mod minimum_should_match;
pub mod named;
pub mod nested;
pub mod not;
pub mod phrase;
pub mod query_string;
pub mod range;
pub mod regexp;
pub mod spatial;
pub mod terms;
pub mod wildcard;

pub use self::boolean::{BooleanPredicateClausesStep, SimpleBooleanPredicateClausesStep};
pub use self::common::{
    FieldSetState, MultiFieldCommonState, MultiFieldMoreStep, MultiFieldOptionsStep,
    MultiFieldStep, apply_boost_and_constant_score,
};
pub use self::factory::SearchPredicateFactory;
pub use self::minimum_should_match::{
    MinimumShouldMatchConditionStep, MinimumShouldMatchMoreStep, MinimumShouldMatchParent,
    MinimumShouldMatchRequirementStep,
};
pub use self::named::{
    NamedPredicateContext, NamedPredicateProvider, QueryParameters, named_predicate_fn,
};
pub use self::query_string::{Full, QueryStringKind, Simple};

use crate::error::Result;
use crate::query::predicate::SearchPredicate;

/// A step that can be turned into a predicate.
pub trait PredicateFinalStep {
    /// Build the predicate, consuming the step.
    fn to_predicate(self) -> Result<SearchPredicate>;
}

impl PredicateFinalStep for SearchPredicate {
    fn to_predicate(self) -> Result<SearchPredicate> {
        Ok(self)
    }
}

impl<T: PredicateFinalStep> PredicateFinalStep for Result<T> {
    fn to_predicate(self) -> Result<SearchPredicate> {
        self?.to_predicate()
    }
}
