//! Helpers shared by the query parsers.

use serde_json::{Map, Value};

use crate::dsl::{MinimumShouldMatchParent, MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::{PilumError, Result};
use crate::query::query::SearchPredicateBuilder;
use crate::value::FieldValue;

pub type JsonObject = Map<String, Value>;

pub fn expect_object<'a>(key: &str, json: &'a Value) -> Result<&'a JsonObject> {
    json.as_object()
        .ok_or_else(|| PilumError::parse(format!("[{key}] expected an object")))
}

pub fn expect_array<'a>(key: &str, json: &'a Value) -> Result<&'a Vec<Value>> {
    json.as_array()
        .ok_or_else(|| PilumError::parse(format!("[{key}] expected an array")))
}

pub fn parse_string<'a>(key: &str, json: &'a Value) -> Result<&'a str> {
    json.as_str()
        .ok_or_else(|| PilumError::parse(format!("[{key}] expected a string")))
}

pub fn parse_float(key: &str, json: &Value) -> Result<f64> {
    json.as_f64()
        .ok_or_else(|| PilumError::parse(format!("[{key}] expected a number")))
}

pub fn parse_integer(key: &str, json: &Value) -> Result<i64> {
    json.as_i64()
        .ok_or_else(|| PilumError::parse(format!("[{key}] expected an integer")))
}

pub fn parse_i32(key: &str, json: &Value) -> Result<i32> {
    let value = parse_integer(key, json)?;
    i32::try_from(value).map_err(|_| PilumError::parse(format!("[{key}] {value} is out of range")))
}

pub fn parse_bool(key: &str, json: &Value) -> Result<bool> {
    json.as_bool()
        .ok_or_else(|| PilumError::parse(format!("[{key}] expected a boolean")))
}

/// Scalar operand; the schema converts it to the field type later.
pub fn parse_value(key: &str, json: &Value) -> Result<FieldValue> {
    match json {
        Value::String(s) => Ok(FieldValue::Text(s.clone())),
        Value::Bool(b) => Ok(FieldValue::Boolean(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(FieldValue::Integer(i)),
            None => n
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| PilumError::parse(format!("[{key}] unsupported number {n}"))),
        },
        _ => Err(PilumError::parse(format!(
            "[{key}] expected a string, number or boolean"
        ))),
    }
}

/// Split `"field^2.5"` into the field and its boost.
pub fn parse_field_and_boost(key: &str, json: &Value) -> Result<(String, Option<f32>)> {
    let string = parse_string(key, json)?;
    match string.split_once('^') {
        None => Ok((string.to_string(), None)),
        Some((field, boost)) => {
            let boost = boost
                .parse::<f32>()
                .map_err(|_| PilumError::parse(format!("[{key}] invalid boost in '{string}'")))?;
            Ok((field.to_string(), Some(boost)))
        }
    }
}

/// Unwrap `{"field": body}`.
pub fn single_entry<'a>(key: &str, object: &'a JsonObject) -> Result<(&'a str, &'a Value)> {
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some((name, value)), None) => Ok((name.as_str(), value)),
        _ => Err(PilumError::parse(format!("[{key}] expected a single field"))),
    }
}

/// `{"field": "value"}` or `{"field": {"<value_key>": "value", ...}}`.
///
/// Returns the field, the value and the options object (empty for the short form).
pub fn field_with_options<'a>(
    key: &str,
    json: &'a Value,
    value_key: &str,
) -> Result<(&'a str, &'a Value, Option<&'a JsonObject>)> {
    let (field, body) = single_entry(key, expect_object(key, json)?)?;
    match body {
        Value::Object(options) => {
            let value = options.get(value_key).ok_or_else(|| {
                PilumError::parse(format!("[{key}] missing [{value_key}] for field '{field}'"))
            })?;
            Ok((field, value, Some(options)))
        }
        value => Ok((field, value, None)),
    }
}

/// Fail on any key outside of `known`.
pub fn check_keys(key: &str, object: &JsonObject, known: &[&str]) -> Result<()> {
    match object.keys().find(|k| !known.contains(&k.as_str())) {
        Some(unknown) => Err(PilumError::parse(format!(
            "[{key}] unrecognized key [{unknown}]"
        ))),
        None => Ok(()),
    }
}

pub fn optional_boost(key: &str, object: Option<&JsonObject>) -> Result<Option<f32>> {
    object
        .and_then(|o| o.get("boost"))
        .map(|boost| parse_float(key, boost).map(|b| b as f32))
        .transpose()
}

/// Declare fields one by one, each with its own boost.
pub fn declare_fields<'s, B: SearchPredicateBuilder>(
    key: &str,
    step: MultiFieldStep<'s, B>,
    fields: &[(String, Option<f32>)],
) -> Result<MultiFieldMoreStep<'s, B>> {
    let ((first, first_boost), rest) = fields
        .split_first()
        .ok_or_else(|| PilumError::parse(format!("[{key}] expected at least one field")))?;

    let mut step = step.field(first)?;
    if let Some(boost) = first_boost {
        step = step.boost(*boost);
    }
    for (field, boost) in rest {
        step = step.field(field)?;
        if let Some(boost) = boost {
            step = step.boost(*boost);
        }
    }
    Ok(step)
}

/// Apply `boost` and `constant_score` options to a field-level predicate.
pub fn apply_score<'s, B: SearchPredicateBuilder>(
    key: &str,
    mut step: MultiFieldOptionsStep<'s, B>,
    options: Option<&JsonObject>,
) -> Result<MultiFieldOptionsStep<'s, B>> {
    if let Some(boost) = optional_boost(key, options)? {
        step = step.boost(boost);
    }
    if let Some(constant_score) = options.and_then(|o| o.get("constant_score")) {
        if parse_bool(key, constant_score)? {
            step = step.constant_score()?;
        }
    }
    Ok(step)
}

/// Apply a minimum-should-match expression.
///
/// Accepts a number (`2`, `-1`), a percentage (`"75%"`) or space-separated
/// conditional brackets (`"2<-1 5<75%"`).
pub fn apply_minimum_should_match<P: MinimumShouldMatchParent>(
    parent: P,
    json: &Value,
) -> Result<P> {
    const KEY: &str = "minimum_should_match";

    if let Some(n) = json.as_i64() {
        let n = i32::try_from(n).map_err(|_| PilumError::parse(format!("[{KEY}] {n} is out of range")))?;
        return parent.minimum_should_match_number(n);
    }

    let expression = parse_string(KEY, json)?;
    let mut parent = parent;
    for bracket in expression.split_whitespace() {
        let (ceiling, requirement) = match bracket.split_once('<') {
            Some((ceiling, requirement)) => {
                let ceiling = ceiling.parse::<i32>().map_err(|_| {
                    PilumError::parse(format!("[{KEY}] invalid ceiling in '{bracket}'"))
                })?;
                (ceiling, requirement)
            }
            None => (0, bracket),
        };

        let step = parent.minimum_should_match().if_more_than(ceiling)?;
        parent = match requirement.strip_suffix('%') {
            Some(percent) => {
                let p = percent.parse::<i32>().map_err(|_| {
                    PilumError::parse(format!("[{KEY}] invalid percentage in '{bracket}'"))
                })?;
                step.then_require_percent(p)?.end()
            }
            None => {
                let n = requirement.parse::<i32>().map_err(|_| {
                    PilumError::parse(format!("[{KEY}] invalid number in '{bracket}'"))
                })?;
                step.then_require_number(n)?.end()
            }
        };
    }
    Ok(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_and_boost() {
        assert_eq!(
            parse_field_and_boost("fields", &json!("title^2")).unwrap(),
            ("title".to_string(), Some(2.0))
        );
        assert_eq!(
            parse_field_and_boost("fields", &json!("body")).unwrap(),
            ("body".to_string(), None)
        );
        assert!(parse_field_and_boost("fields", &json!("body^x")).is_err());
    }

    #[test]
    fn test_field_with_options() {
        let short = json!({"title": "rust"});
        let (field, value, options) = field_with_options("match", &short, "query").unwrap();
        assert_eq!(field, "title");
        assert_eq!(value, &json!("rust"));
        assert!(options.is_none());

        let long = json!({"title": {"query": "rust", "boost": 2}});
        let (_, value, options) = field_with_options("match", &long, "query").unwrap();
        assert_eq!(value, &json!("rust"));
        assert_eq!(optional_boost("match", options).unwrap(), Some(2.0));

        let missing = json!({"title": {"boost": 2}});
        assert!(matches!(
            field_with_options("match", &missing, "query"),
            Err(PilumError::QueryParse(_))
        ));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("v", &json!(3)).unwrap(), FieldValue::Integer(3));
        assert_eq!(parse_value("v", &json!(1.5)).unwrap(), FieldValue::Float(1.5));
        assert_eq!(parse_value("v", &json!(true)).unwrap(), FieldValue::Boolean(true));
        assert!(parse_value("v", &json!(null)).is_err());
    }
}
