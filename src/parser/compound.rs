//! Parses compound queries: `bool`, `not`, `constant_score`, `nested`,
//! `match_all` and `match_none`.

use serde_json::Value;

use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
use crate::error::{PilumError, Result};
use crate::parser::parse;
use crate::parser::utils::{
    apply_minimum_should_match, check_keys, expect_object, optional_boost, parse_string,
};
use crate::query::predicate::SearchPredicate;

/// A clause list may be a single query or an array of queries.
fn clauses<'a>(json: &'a Value) -> impl Iterator<Item = &'a Value> {
    let clauses: &'a [Value] = match json {
        Value::Array(array) => array,
        single => std::slice::from_ref(single),
    };
    clauses.iter()
}

pub fn parse_bool_query(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = expect_object("bool", json)?;

    let mut step = f.bool();
    for (key, value) in object {
        match key.as_str() {
            "must" => {
                for clause in clauses(value) {
                    step = step.must(parse(f, clause))?;
                }
            }
            "should" => {
                for clause in clauses(value) {
                    step = step.should(parse(f, clause))?;
                }
            }
            "must_not" => {
                for clause in clauses(value) {
                    step = step.must_not(parse(f, clause))?;
                }
            }
            "filter" => {
                for clause in clauses(value) {
                    step = step.filter(parse(f, clause))?;
                }
            }
            "minimum_should_match" | "boost" => {}
            unknown => {
                return Err(PilumError::parse(format!(
                    "[bool] unrecognized key [{unknown}]"
                )));
            }
        }
    }

    if let Some(msm) = object.get("minimum_should_match") {
        step = apply_minimum_should_match(step, msm)?;
    }
    if let Some(boost) = optional_boost("bool", Some(object))? {
        step = step.boost(boost);
    }
    step.to_predicate()
}

/// `{"not": <query>}`
pub fn parse_not(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    f.not(parse(f, json))?.to_predicate()
}

/// `{"constant_score": {"filter": <query>, "boost": 1.5}}`
pub fn parse_constant_score(
    f: &SearchPredicateFactory<'_>,
    json: &Value,
) -> Result<SearchPredicate> {
    let object = expect_object("constant_score", json)?;
    check_keys("constant_score", object, &["filter", "boost"])?;

    let filter = object
        .get("filter")
        .ok_or_else(|| PilumError::parse("[constant_score] missing [filter]"))?;
    let mut step = f.bool().filter(parse(f, filter))?.constant_score();
    if let Some(boost) = optional_boost("constant_score", Some(object))? {
        step = step.boost(boost);
    }
    step.to_predicate()
}

/// `{"nested": {"path": "authors", "query": <query>}}`
pub fn parse_nested(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = expect_object("nested", json)?;
    check_keys("nested", object, &["path", "query", "boost"])?;

    let path = object
        .get("path")
        .ok_or_else(|| PilumError::parse("[nested] missing [path]"))?;
    let query = object
        .get("query")
        .ok_or_else(|| PilumError::parse("[nested] missing [query]"))?;

    let mut step = f.nested(parse_string("path", path)?)?.add(parse(f, query))?;
    if let Some(boost) = optional_boost("nested", Some(object))? {
        step = step.boost(boost);
    }
    step.to_predicate()
}

pub fn parse_match_all(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = expect_object("match_all", json)?;
    check_keys("match_all", object, &["boost"])?;

    let mut step = f.match_all();
    if let Some(boost) = optional_boost("match_all", Some(object))? {
        step = step.boost(boost);
    }
    step.to_predicate()
}

pub fn parse_match_none(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    check_keys("match_none", expect_object("match_none", json)?, &[])?;
    Ok(f.match_none())
}
