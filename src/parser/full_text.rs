//! Parses full-text queries: `match`, `multi_match`, `match_phrase`,
//! `simple_query_string` and `query_string`.

use serde_json::Value;

use crate::dsl::{Full, PredicateFinalStep, QueryStringKind, SearchPredicateFactory};
use crate::dsl::matching::MatchPredicateOptionsStep;
use crate::dsl::query_string::{QueryStringPredicateFieldStep, QueryStringPredicateOptionsStep};
use crate::error::{PilumError, Result};
use crate::parser::utils::{
    JsonObject, apply_minimum_should_match, apply_score, check_keys, declare_fields,
    expect_array, expect_object, field_with_options, optional_boost, parse_bool,
    parse_field_and_boost, parse_i32, parse_string, parse_value,
};
use crate::query::predicate::SearchPredicate;
use crate::query::query_string::{BooleanOperator, RewriteMethod, SimpleQueryFlag};

const MATCH_KEYS: &[&str] = &[
    "query",
    "fuzziness",
    "prefix_length",
    "analyzer",
    "boost",
    "constant_score",
];

const MULTI_MATCH_KEYS: &[&str] = &[
    "query",
    "fields",
    "fuzziness",
    "prefix_length",
    "analyzer",
    "boost",
    "constant_score",
];

pub fn parse_match(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let (field, value, options) = field_with_options("match", json, "query")?;
    if let Some(options) = options {
        check_keys("match", options, MATCH_KEYS)?;
    }

    let step = f
        .match_()
        .field(field)?
        .matching(parse_value("match", value)?)?;
    apply_match_options(f, "match", step, options)?.to_predicate()
}

pub fn parse_multi_match(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = expect_object("multi_match", json)?;
    check_keys("multi_match", object, MULTI_MATCH_KEYS)?;

    let fields = parse_fields("multi_match", object)?;
    let query = object
        .get("query")
        .ok_or_else(|| PilumError::parse("[multi_match] missing [query]"))?;

    let step = declare_fields("multi_match", f.match_(), &fields)?
        .matching(parse_value("multi_match", query)?)?;
    apply_match_options(f, "multi_match", step, Some(object))?.to_predicate()
}

fn apply_match_options<'s>(
    f: &SearchPredicateFactory<'_>,
    key: &str,
    mut step: MatchPredicateOptionsStep<'s>,
    options: Option<&JsonObject>,
) -> Result<MatchPredicateOptionsStep<'s>> {
    let Some(options) = options else {
        return Ok(step);
    };

    if let Some(fuzziness) = options.get("fuzziness") {
        let prefix_length = options
            .get("prefix_length")
            .map(|p| parse_i32("prefix_length", p))
            .transpose()?;
        step = match (fuzziness, prefix_length) {
            (Value::String(auto), None) if auto.eq_ignore_ascii_case("auto") => step.fuzzy()?,
            (Value::String(auto), Some(prefix_length)) if auto.eq_ignore_ascii_case("auto") => {
                let distance = f.scope().config().default_fuzzy_max_edit_distance;
                step.fuzzy_with(distance, prefix_length)?
            }
            (distance, None) => step.fuzzy_with_distance(parse_i32("fuzziness", distance)?)?,
            (distance, Some(prefix_length)) => {
                step.fuzzy_with(parse_i32("fuzziness", distance)?, prefix_length)?
            }
        };
    }
    if let Some(analyzer) = options.get("analyzer") {
        step = step.analyzer(parse_string("analyzer", analyzer)?)?;
    }
    apply_score(key, step, Some(options))
}

pub fn parse_match_phrase(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let (field, value, options) = field_with_options("match_phrase", json, "query")?;
    let mut step = f
        .phrase()
        .field(field)?
        .matching(parse_string("match_phrase", value)?)?;

    if let Some(options) = options {
        check_keys(
            "match_phrase",
            options,
            &["query", "slop", "analyzer", "boost", "constant_score"],
        )?;
        if let Some(slop) = options.get("slop") {
            step = step.slop(parse_i32("slop", slop)?)?;
        }
        if let Some(analyzer) = options.get("analyzer") {
            step = step.analyzer(parse_string("analyzer", analyzer)?);
        }
    }
    apply_score("match_phrase", step, options)?.to_predicate()
}

const SIMPLE_QUERY_STRING_KEYS: &[&str] = &[
    "query",
    "fields",
    "default_operator",
    "analyzer",
    "minimum_should_match",
    "boost",
    "constant_score",
    "flags",
];

const QUERY_STRING_KEYS: &[&str] = &[
    "query",
    "fields",
    "default_operator",
    "analyzer",
    "minimum_should_match",
    "boost",
    "constant_score",
    "phrase_slop",
    "allow_leading_wildcard",
    "enable_position_increments",
    "rewrite",
];

pub fn parse_simple_query_string(
    f: &SearchPredicateFactory<'_>,
    json: &Value,
) -> Result<SearchPredicate> {
    const KEY: &str = "simple_query_string";
    let object = expect_object(KEY, json)?;
    check_keys(KEY, object, SIMPLE_QUERY_STRING_KEYS)?;

    let mut step = query_string_common(KEY, f.simple_query_string(), object)?;
    if let Some(flags) = object.get("flags") {
        let flags = parse_string("flags", flags)?
            .split('|')
            .map(|name| {
                SimpleQueryFlag::from_name(name.trim())
                    .ok_or_else(|| PilumError::parse(format!("[{KEY}] unknown flag [{name}]")))
            })
            .collect::<Result<Vec<_>>>()?;
        step = step.flags(flags);
    }
    query_string_score(KEY, step, object)?.to_predicate()
}

pub fn parse_query_string(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    const KEY: &str = "query_string";
    let object = expect_object(KEY, json)?;
    check_keys(KEY, object, QUERY_STRING_KEYS)?;

    let mut step: QueryStringPredicateOptionsStep<Full> =
        query_string_common(KEY, f.query_string(), object)?;
    if let Some(slop) = object.get("phrase_slop") {
        step = step.phrase_slop(parse_i32("phrase_slop", slop)?)?;
    }
    if let Some(allow) = object.get("allow_leading_wildcard") {
        step = step.allow_leading_wildcard(parse_bool("allow_leading_wildcard", allow)?);
    }
    if let Some(enable) = object.get("enable_position_increments") {
        step = step.enable_position_increments(parse_bool("enable_position_increments", enable)?);
    }
    if let Some(rewrite) = object.get("rewrite") {
        step = match parse_rewrite(parse_string("rewrite", rewrite)?)? {
            (method, None) => step.rewrite_method(method)?,
            (method, Some(n)) => step.rewrite_method_with(method, n)?,
        };
    }
    query_string_score(KEY, step, object)?.to_predicate()
}

fn query_string_common<K: QueryStringKind>(
    key: &str,
    step: QueryStringPredicateFieldStep<'_, K>,
    object: &JsonObject,
) -> Result<QueryStringPredicateOptionsStep<K>> {
    let query = object
        .get("query")
        .ok_or_else(|| PilumError::parse(format!("[{key}] missing [query]")))?;

    let mut step = step;
    for (field, boost) in parse_fields(key, object)? {
        step = step.field(&field);
        if let Some(boost) = boost {
            step = step.boost(boost);
        }
    }

    let mut step = step.matching(parse_string(key, query)?)?;
    if let Some(operator) = object.get("default_operator") {
        let operator = match parse_string("default_operator", operator)?
            .to_ascii_lowercase()
            .as_str()
        {
            "and" => BooleanOperator::And,
            "or" => BooleanOperator::Or,
            other => {
                return Err(PilumError::parse(format!(
                    "[{key}] invalid default_operator [{other}]"
                )));
            }
        };
        step = step.default_operator(operator);
    }
    if let Some(analyzer) = object.get("analyzer") {
        step = step.analyzer(parse_string("analyzer", analyzer)?);
    }
    if let Some(msm) = object.get("minimum_should_match") {
        step = apply_minimum_should_match(step, msm)?;
    }
    Ok(step)
}

fn query_string_score<K: QueryStringKind>(
    key: &str,
    mut step: QueryStringPredicateOptionsStep<K>,
    object: &JsonObject,
) -> Result<QueryStringPredicateOptionsStep<K>> {
    if let Some(boost) = optional_boost(key, Some(object))? {
        step = step.boost(boost);
    }
    if let Some(constant_score) = object.get("constant_score") {
        if parse_bool(key, constant_score)? {
            step = step.constant_score()?;
        }
    }
    Ok(step)
}

fn parse_fields(key: &str, object: &JsonObject) -> Result<Vec<(String, Option<f32>)>> {
    let fields = object
        .get("fields")
        .ok_or_else(|| PilumError::parse(format!("[{key}] missing [fields]")))?;
    expect_array(key, fields)?
        .iter()
        .map(|field| parse_field_and_boost(key, field))
        .collect()
}

/// `top_terms_boost_10` → (`TopTermsBoostN`, `Some(10)`).
fn parse_rewrite(name: &str) -> Result<(RewriteMethod, Option<i32>)> {
    let (method, size) = match name.rsplit_once('_') {
        Some((base, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            let size = digits
                .parse::<i32>()
                .map_err(|_| PilumError::parse(format!("[rewrite] invalid size in [{name}]")))?;
            (RewriteMethod::from_name(&format!("{base}_n")), Some(size))
        }
        _ => (RewriteMethod::from_name(name), None),
    };
    method
        .map(|method| (method, size))
        .ok_or_else(|| PilumError::parse(format!("[rewrite] unknown rewrite method [{name}]")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rewrite() {
        assert_eq!(
            parse_rewrite("top_terms_boost_10").unwrap(),
            (RewriteMethod::TopTermsBoostN, Some(10))
        );
        assert_eq!(
            parse_rewrite("constant_score").unwrap(),
            (RewriteMethod::ConstantScore, None)
        );
        // Missing size is left to the builder to reject.
        assert_eq!(
            parse_rewrite("top_terms_n").unwrap(),
            (RewriteMethod::TopTermsN, None)
        );
        assert!(parse_rewrite("bogus").is_err());
    }
}
