//! Predicate model and per-kind predicate builders.
//!
//! Builders are created by resolving a field through a
//! [`SearchIndexScope`](crate::scope::SearchIndexScope), mutated by the
//! fluent DSL, and consumed into an immutable [`SearchPredicate`].

pub mod boolean;
pub mod exists;
pub mod fuzzy;
pub mod geo;
pub mod knn;
pub mod match_all;
pub mod matching;
pub mod minimum_should_match;
pub mod nested;
pub mod phrase;
pub mod predicate;
pub mod prefix;
#[allow(clippy::module_inception)]
pub mod query;
pub mod query_string;
pub mod range;
pub mod regexp;
pub mod terms;
pub mod wildcard;

pub use self::boolean::{BooleanPredicate, BooleanPredicateBuilder, Occur};
pub use self::exists::ExistsPredicateBuilder;
pub use self::fuzzy::Fuzziness;
pub use self::geo::SpatialWithinPredicateBuilder;
pub use self::knn::KnnPredicateBuilder;
pub use self::match_all::{IdPredicateBuilder, MatchAllPredicateBuilder};
pub use self::matching::MatchPredicateBuilder;
pub use self::minimum_should_match::{
    MinimumShouldMatchBuilder, MinimumShouldMatchConstraints, MinimumShouldMatchRequirement,
};
pub use self::nested::NestedPredicateBuilder;
pub use self::phrase::PhrasePredicateBuilder;
pub use self::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
pub use self::prefix::PrefixPredicateBuilder;
pub use self::query::SearchPredicateBuilder;
pub use self::query_string::{
    BooleanOperator, QueryStringField, QueryStringPredicate, QueryStringPredicateBuilder,
    QueryStringSyntax, Rewrite, RewriteMethod, SimpleQueryFlag,
};
pub use self::range::{Bound, Range, RangePredicateBuilder};
pub use self::regexp::{RegexpPredicateBuilder, RegexpQueryFlag};
pub use self::terms::TermsPredicateBuilder;
pub use self::wildcard::WildcardPredicateBuilder;
