//! Parses an Elasticsearch-flavoured JSON query DSL into predicates.
//!
//! Every query is an object with a single key naming its type:
//!
//! ```
//! use pilum::dsl::SearchPredicateFactory;
//! use pilum::parser::parse_str;
//! use pilum::schema::IndexSchema;
//!
//! let schema = IndexSchema::builder().text("title").integer("year").build().unwrap();
//! let f = SearchPredicateFactory::new(&schema);
//!
//! let predicate = parse_str(
//!     &f,
//!     r#"{"bool": {"must": {"match": {"title": "rust"}}, "filter": {"range": {"year": {"gte": 2020}}}}}"#,
//! )
//! .unwrap();
//! assert_eq!(predicate.to_string(), "+title:rust #year:[2020 TO *}");
//! ```

pub mod compound;
pub mod full_text;
pub mod specialized;
pub mod term_level;
pub mod utils;

use serde_json::Value;
use tracing::trace;

use crate::dsl::SearchPredicateFactory;
use crate::error::{PilumError, Result};
use crate::query::predicate::SearchPredicate;

type QueryParser = fn(&SearchPredicateFactory<'_>, &Value) -> Result<SearchPredicate>;

fn get_query_parser(query_type: &str) -> Option<QueryParser> {
    match query_type {
        "match" => Some(full_text::parse_match),
        "multi_match" => Some(full_text::parse_multi_match),
        "match_phrase" => Some(full_text::parse_match_phrase),
        "simple_query_string" => Some(full_text::parse_simple_query_string),
        "query_string" => Some(full_text::parse_query_string),
        "term" => Some(term_level::parse_term),
        "terms" => Some(term_level::parse_terms),
        "range" => Some(term_level::parse_range),
        "wildcard" => Some(term_level::parse_wildcard),
        "prefix" => Some(term_level::parse_prefix),
        "regexp" => Some(term_level::parse_regexp),
        "exists" => Some(term_level::parse_exists),
        "ids" => Some(term_level::parse_ids),
        "bool" => Some(compound::parse_bool_query),
        "not" => Some(compound::parse_not),
        "constant_score" => Some(compound::parse_constant_score),
        "nested" => Some(compound::parse_nested),
        "match_all" => Some(compound::parse_match_all),
        "match_none" => Some(compound::parse_match_none),
        "geo_distance" => Some(specialized::parse_geo_distance),
        "geo_bounding_box" => Some(specialized::parse_geo_bounding_box),
        "geo_polygon" => Some(specialized::parse_geo_polygon),
        "knn" => Some(specialized::parse_knn),
        _ => None,
    }
}

/// Parse a JSON query.
pub fn parse(factory: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = json
        .as_object()
        .ok_or_else(|| PilumError::parse("expected a query object"))?;

    let mut entries = object.iter();
    let (query_type, body) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(PilumError::parse(
                "expected a single key naming the query type",
            ));
        }
    };

    let parse = get_query_parser(query_type)
        .ok_or_else(|| PilumError::parse(format!("unknown query type [{query_type}]")))?;
    trace!(query_type = %query_type, "parsing query");
    parse(factory, body)
}

/// Parse a JSON query from text.
pub fn parse_str(factory: &SearchPredicateFactory<'_>, json: &str) -> Result<SearchPredicate> {
    let json: Value = serde_json::from_str(json)?;
    parse(factory, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::PredicateKind;
    use crate::schema::IndexSchema;
    use serde_json::json;

    fn schema() -> IndexSchema {
        IndexSchema::builder()
            .text("title")
            .text("body")
            .keyword("tags")
            .integer("year")
            .geo_point("location")
            .vector("embedding", 3)
            .object("authors", true)
            .text("authors.name")
            .build()
            .unwrap()
    }

    fn render(json: Value) -> String {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);
        parse(&f, &json).unwrap().to_string()
    }

    fn error(json: Value) -> PilumError {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);
        match parse(&f, &json) {
            Err(e) => e,
            Ok(p) => panic!("Expected an error, got {p}"),
        }
    }

    #[test]
    fn test_parse_match() {
        assert_eq!(render(json!({"match": {"title": "rust"}})), "title:rust");
        assert_eq!(
            render(json!({"match": {"title": {"query": "rust", "fuzziness": 1, "boost": 2}}})),
            "(title:rust~1)^2.0"
        );
    }

    #[test]
    fn test_parse_multi_match_field_boosts() {
        let rendered = render(json!({
            "multi_match": {"query": "rust", "fields": ["title^3", "body"]}
        }));
        assert_eq!(rendered, "(title:rust)^3.0 body:rust");
    }

    #[test]
    fn test_parse_bool() {
        let rendered = render(json!({
            "bool": {
                "should": [
                    {"match": {"title": "rust"}},
                    {"match": {"body": "rust"}},
                    {"terms": {"tags": ["lang", "systems"]}}
                ],
                "must_not": {"range": {"year": {"lt": 2000}}},
                "minimum_should_match": 2
            }
        }));
        assert_eq!(
            rendered,
            "(title:rust body:rust tags:(lang systems) -year:{* TO 2000})~2"
        );
    }

    #[test]
    fn test_parse_nested_and_knn() {
        let nested = render(json!({
            "nested": {"path": "authors", "query": {"match": {"authors.name": "ada"}}}
        }));
        assert_eq!(nested, "Nested(authors: authors.name:ada)");

        let knn = render(json!({
            "knn": {"field": "embedding", "query_vector": [1, 0, 0], "k": 5}
        }));
        assert_eq!(knn, "Knn(embedding, k=5, vector=[1.0, 0.0, 0.0])");
    }

    #[test]
    fn test_parse_geo_distance() {
        let schema = schema();
        let f = SearchPredicateFactory::new(&schema);
        let predicate = parse(
            &f,
            &json!({"geo_distance": {"distance": "2km", "location": {"lat": 48.85, "lon": 2.35}}}),
        )
        .unwrap();
        assert!(matches!(predicate.kind(), PredicateKind::Spatial { .. }));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            error(json!({"fuzzy": {"title": "rust"}})),
            PilumError::QueryParse(_)
        ));
        assert!(matches!(
            error(json!({"match": {"title": "a"}, "term": {"tags": "b"}})),
            PilumError::QueryParse(_)
        ));
        assert!(matches!(
            error(json!({"match": {"title": {"query": "rust", "bogus": 1}}})),
            PilumError::QueryParse(_)
        ));
        // DSL errors surface unchanged.
        assert!(matches!(
            error(json!({"range": {"year": {}}})),
            PilumError::NullRange { .. }
        ));
        assert!(matches!(
            error(json!({"range": {"title": {"gte": 1}}})),
            PilumError::UnsupportedPredicate { .. }
        ));
    }
}
