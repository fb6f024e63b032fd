//! Predicate type keys, one per field-level predicate kind.

use crate::query::exists::ExistsPredicateBuilder;
use crate::query::geo::SpatialWithinPredicateBuilder;
use crate::query::knn::KnnPredicateBuilder;
use crate::query::matching::MatchPredicateBuilder;
use crate::query::nested::NestedPredicateBuilder;
use crate::query::phrase::PhrasePredicateBuilder;
use crate::query::prefix::PrefixPredicateBuilder;
use crate::query::query_string::QueryStringField;
use crate::query::range::RangePredicateBuilder;
use crate::query::regexp::RegexpPredicateBuilder;
use crate::query::terms::TermsPredicateBuilder;
use crate::query::wildcard::WildcardPredicateBuilder;
use crate::scope::{PredicateTypeKey, ResolutionTiming};

pub const MATCH_NAME: &str = "match";
pub const RANGE_NAME: &str = "range";
pub const PHRASE_NAME: &str = "phrase";
pub const WILDCARD_NAME: &str = "wildcard";
pub const PREFIX_NAME: &str = "prefix";
pub const REGEXP_NAME: &str = "regexp";
pub const TERMS_NAME: &str = "terms";
pub const EXISTS_NAME: &str = "exists";
pub const SPATIAL_WITHIN_NAME: &str = "spatial:within";
pub const KNN_NAME: &str = "knn";
pub const NESTED_NAME: &str = "nested";
pub const SIMPLE_QUERY_STRING_NAME: &str = "simple-query-string";
pub const QUERY_STRING_NAME: &str = "query-string";

pub const MATCH: PredicateTypeKey<MatchPredicateBuilder> =
    PredicateTypeKey::new(MATCH_NAME, ResolutionTiming::Lazy, MatchPredicateBuilder::new);

pub const RANGE: PredicateTypeKey<RangePredicateBuilder> =
    PredicateTypeKey::new(RANGE_NAME, ResolutionTiming::Eager, RangePredicateBuilder::new);

pub const PHRASE: PredicateTypeKey<PhrasePredicateBuilder> =
    PredicateTypeKey::new(PHRASE_NAME, ResolutionTiming::Lazy, PhrasePredicateBuilder::new);

pub const WILDCARD: PredicateTypeKey<WildcardPredicateBuilder> = PredicateTypeKey::new(
    WILDCARD_NAME,
    ResolutionTiming::Lazy,
    WildcardPredicateBuilder::new,
);

pub const PREFIX: PredicateTypeKey<PrefixPredicateBuilder> =
    PredicateTypeKey::new(PREFIX_NAME, ResolutionTiming::Lazy, PrefixPredicateBuilder::new);

pub const REGEXP: PredicateTypeKey<RegexpPredicateBuilder> =
    PredicateTypeKey::new(REGEXP_NAME, ResolutionTiming::Lazy, RegexpPredicateBuilder::new);

pub const TERMS: PredicateTypeKey<TermsPredicateBuilder> =
    PredicateTypeKey::new(TERMS_NAME, ResolutionTiming::Lazy, TermsPredicateBuilder::new);

pub const EXISTS: PredicateTypeKey<ExistsPredicateBuilder> =
    PredicateTypeKey::new(EXISTS_NAME, ResolutionTiming::Eager, ExistsPredicateBuilder::new);

pub const SPATIAL_WITHIN: PredicateTypeKey<SpatialWithinPredicateBuilder> = PredicateTypeKey::new(
    SPATIAL_WITHIN_NAME,
    ResolutionTiming::Eager,
    SpatialWithinPredicateBuilder::new,
);

pub const KNN: PredicateTypeKey<KnnPredicateBuilder> =
    PredicateTypeKey::new(KNN_NAME, ResolutionTiming::Eager, KnnPredicateBuilder::new);

pub const NESTED: PredicateTypeKey<NestedPredicateBuilder> =
    PredicateTypeKey::new(NESTED_NAME, ResolutionTiming::Eager, NestedPredicateBuilder::new);

pub const SIMPLE_QUERY_STRING: PredicateTypeKey<QueryStringField> = PredicateTypeKey::new(
    SIMPLE_QUERY_STRING_NAME,
    ResolutionTiming::Lazy,
    QueryStringField::new,
);

pub const QUERY_STRING: PredicateTypeKey<QueryStringField> =
    PredicateTypeKey::new(QUERY_STRING_NAME, ResolutionTiming::Lazy, QueryStringField::new);
