//! Parses term-level queries: `term`, `terms`, `range`, `wildcard`, `prefix`,
//! `regexp`, `exists` and `ids`.

use serde_json::Value;

use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
use crate::error::{PilumError, Result};
use crate::parser::utils::{
    apply_score, check_keys, expect_array, expect_object, field_with_options, optional_boost,
    parse_bool, parse_string, parse_value, single_entry,
};
use crate::query::predicate::SearchPredicate;
use crate::query::range::{Bound, Range};
use crate::query::regexp::RegexpQueryFlag;
use crate::value::FieldValue;

/// `term` is a `match` whose value skips analysis.
pub fn parse_term(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let (field, value, options) = field_with_options("term", json, "value")?;
    if let Some(options) = options {
        check_keys("term", options, &["value", "boost", "constant_score"])?;
    }

    let step = f
        .match_()
        .field(field)?
        .matching(parse_value("term", value)?)?
        .skip_analysis();
    apply_score("term", step, options)?.to_predicate()
}

/// `{"terms": {"tags": ["a", "b"], "match_all": false, "boost": 2}}`
pub fn parse_terms(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = expect_object("terms", json)?;

    let mut field = None;
    let mut match_all = false;
    for (key, value) in object {
        match key.as_str() {
            "boost" | "constant_score" => {}
            "match_all" => match_all = parse_bool("match_all", value)?,
            name => {
                if field.is_some() {
                    return Err(PilumError::parse("[terms] expected a single field"));
                }
                field = Some((name, value));
            }
        }
    }
    let (field, values) = field.ok_or_else(|| PilumError::parse("[terms] missing field"))?;
    let values = expect_array("terms", values)?
        .iter()
        .map(|value| parse_value("terms", value))
        .collect::<Result<Vec<_>>>()?;

    let step = f.terms().field(field)?;
    let step = if match_all {
        step.matching_all(values)?
    } else {
        step.matching_any(values)?
    };
    apply_score("terms", step, Some(object))?.to_predicate()
}

/// `{"range": {"year": {"gte": 2000, "lt": 2010}}}`
pub fn parse_range(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let (field, body) = single_entry("range", expect_object("range", json)?)?;
    let options = expect_object("range", body)?;
    check_keys(
        "range",
        options,
        &["gte", "gt", "lte", "lt", "boost", "constant_score"],
    )?;

    let lower = bound(options.get("gte"), options.get("gt"), "gte", "gt")?;
    let upper = bound(options.get("lte"), options.get("lt"), "lte", "lt")?;

    let step = f.range().field(field)?.within(Range::new(lower, upper))?;
    apply_score("range", step, Some(options))?.to_predicate()
}

fn bound(
    included: Option<&Value>,
    excluded: Option<&Value>,
    included_key: &str,
    excluded_key: &str,
) -> Result<Bound<FieldValue>> {
    match (included, excluded) {
        (Some(_), Some(_)) => Err(PilumError::parse(format!(
            "[range] [{included_key}] and [{excluded_key}] are mutually exclusive"
        ))),
        (Some(value), None) => Ok(Bound::Included(parse_value(included_key, value)?)),
        (None, Some(value)) => Ok(Bound::Excluded(parse_value(excluded_key, value)?)),
        (None, None) => Ok(Bound::Unbounded),
    }
}

pub fn parse_wildcard(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let (field, value, options) = field_with_options("wildcard", json, "value")?;
    if let Some(options) = options {
        check_keys("wildcard", options, &["value", "boost", "constant_score"])?;
    }

    let step = f
        .wildcard()
        .field(field)?
        .matching(parse_string("wildcard", value)?)?;
    apply_score("wildcard", step, options)?.to_predicate()
}

pub fn parse_prefix(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let (field, value, options) = field_with_options("prefix", json, "value")?;
    if let Some(options) = options {
        check_keys("prefix", options, &["value", "boost", "constant_score"])?;
    }

    let step = f
        .prefix()
        .field(field)?
        .matching(parse_string("prefix", value)?)?;
    apply_score("prefix", step, options)?.to_predicate()
}

/// `{"regexp": {"title": {"value": "ru.*", "flags": "INTERVAL|ANYSTRING"}}}`
pub fn parse_regexp(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let (field, value, options) = field_with_options("regexp", json, "value")?;

    let mut step = f
        .regexp()
        .field(field)?
        .matching(parse_string("regexp", value)?)?;
    if let Some(options) = options {
        check_keys("regexp", options, &["value", "flags", "boost", "constant_score"])?;
        if let Some(flags) = options.get("flags") {
            let flags = parse_string("flags", flags)?
                .split('|')
                .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("NONE"))
                .map(|name| {
                    RegexpQueryFlag::from_name(name)
                        .ok_or_else(|| PilumError::parse(format!("[regexp] unknown flag [{name}]")))
                })
                .collect::<Result<Vec<_>>>()?;
            step = step.flags(flags);
        }
    }
    apply_score("regexp", step, options)?.to_predicate()
}

/// `{"exists": {"field": "title"}}`
pub fn parse_exists(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = expect_object("exists", json)?;
    check_keys("exists", object, &["field", "boost"])?;

    let field = object
        .get("field")
        .ok_or_else(|| PilumError::parse("[exists] missing [field]"))?;
    let mut step = f.exists().field(parse_string("exists", field)?)?;
    if let Some(boost) = optional_boost("exists", Some(object))? {
        step = step.boost(boost);
    }
    step.to_predicate()
}

/// `{"ids": {"values": ["1", "2"]}}`
pub fn parse_ids(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    let object = expect_object("ids", json)?;
    check_keys("ids", object, &["values", "boost"])?;

    let values = object
        .get("values")
        .ok_or_else(|| PilumError::parse("[ids] missing [values]"))?;
    let ids = expect_array("ids", values)?
        .iter()
        .map(|id| match id {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(PilumError::parse("[ids] expected string or numeric ids")),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut step = f.id().matching_any(ids);
    if let Some(boost) = optional_boost("ids", Some(object))? {
        step = step.boost(boost);
    }
    step.to_predicate()
}
