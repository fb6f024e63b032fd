//! Parses geo and vector queries: `geo_distance`, `geo_bounding_box`,
//! `geo_polygon` and `knn`.

use serde_json::Value;

use crate::dsl::{PredicateFinalStep, SearchPredicateFactory};
use crate::error::{PilumError, Result};
use crate::parser::parse;
use crate::parser::utils::{
    JsonObject, apply_score, check_keys, expect_array, expect_object, optional_boost,
    parse_float, parse_integer, parse_string,
};
use crate::query::predicate::SearchPredicate;
use crate::spatial::{DistanceUnit, GeoBoundingBox, GeoPoint, GeoPolygon};

/// A point as `{"lat": 1, "lon": 2}`, `[lon, lat]` or `"lat,lon"`.
pub fn parse_point(key: &str, json: &Value) -> Result<GeoPoint> {
    match json {
        Value::Object(object) => {
            let lat = object
                .get("lat")
                .ok_or_else(|| PilumError::parse(format!("[{key}] missing [lat]")))?;
            let lon = object
                .get("lon")
                .ok_or_else(|| PilumError::parse(format!("[{key}] missing [lon]")))?;
            GeoPoint::new(parse_float(key, lat)?, parse_float(key, lon)?)
        }
        Value::Array(array) => match array.as_slice() {
            [lon, lat] => GeoPoint::new(parse_float(key, lat)?, parse_float(key, lon)?),
            _ => Err(PilumError::parse(format!("[{key}] expected [lon, lat]"))),
        },
        Value::String(s) => {
            let (lat, lon) = s
                .split_once(',')
                .ok_or_else(|| PilumError::parse(format!("[{key}] expected \"lat,lon\"")))?;
            let coordinate = |c: &str| {
                c.trim()
                    .parse::<f64>()
                    .map_err(|_| PilumError::parse(format!("[{key}] invalid coordinate '{c}'")))
            };
            GeoPoint::new(coordinate(lat)?, coordinate(lon)?)
        }
        _ => Err(PilumError::parse(format!("[{key}] expected a geo point"))),
    }
}

/// A distance as a number of meters or a string such as `"12km"`.
pub fn parse_distance(json: &Value) -> Result<(f64, DistanceUnit)> {
    if let Some(meters) = json.as_f64() {
        return Ok((meters, DistanceUnit::Meters));
    }
    let distance = parse_string("distance", json)?.trim();
    let split = distance
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(distance.len());
    let (value, suffix) = distance.split_at(split);
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| PilumError::parse(format!("[distance] invalid distance '{distance}'")))?;
    let unit = DistanceUnit::from_suffix(suffix)
        .ok_or_else(|| PilumError::parse(format!("[distance] unknown unit '{suffix}'")))?;
    Ok((value, unit))
}

/// The one key of a geo query that is not an option.
fn geo_field<'a>(
    key: &str,
    object: &'a JsonObject,
    options: &[&str],
) -> Result<(&'a str, &'a Value)> {
    let mut fields = object
        .iter()
        .filter(|(name, _)| !options.contains(&name.as_str()));
    match (fields.next(), fields.next()) {
        (Some((name, value)), None) => Ok((name.as_str(), value)),
        _ => Err(PilumError::parse(format!("[{key}] expected a single field"))),
    }
}

/// `{"geo_distance": {"distance": "10km", "location": {"lat": 1, "lon": 2}}}`
pub fn parse_geo_distance(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    const KEY: &str = "geo_distance";
    let object = expect_object(KEY, json)?;
    let (field, center) = geo_field(KEY, object, &["distance", "boost", "constant_score"])?;

    let distance = object
        .get("distance")
        .ok_or_else(|| PilumError::parse(format!("[{KEY}] missing [distance]")))?;
    let (radius, unit) = parse_distance(distance)?;

    let step = f
        .spatial()
        .within()
        .field(field)?
        .circle(parse_point(KEY, center)?, radius, unit)?;
    apply_score(KEY, step, Some(object))?.to_predicate()
}

/// `{"geo_bounding_box": {"location": {"top_left": .., "bottom_right": ..}}}`
pub fn parse_geo_bounding_box(
    f: &SearchPredicateFactory<'_>,
    json: &Value,
) -> Result<SearchPredicate> {
    const KEY: &str = "geo_bounding_box";
    let object = expect_object(KEY, json)?;
    let (field, corners) = geo_field(KEY, object, &["boost", "constant_score"])?;
    let corners = expect_object(KEY, corners)?;
    check_keys(KEY, corners, &["top_left", "bottom_right"])?;

    let corner = |name: &str| -> Result<GeoPoint> {
        let point = corners
            .get(name)
            .ok_or_else(|| PilumError::parse(format!("[{KEY}] missing [{name}]")))?;
        parse_point(KEY, point)
    };
    let bounding_box = GeoBoundingBox::new(corner("top_left")?, corner("bottom_right")?)?;

    let step = f
        .spatial()
        .within()
        .field(field)?
        .bounding_box(bounding_box)?;
    apply_score(KEY, step, Some(object))?.to_predicate()
}

/// `{"geo_polygon": {"location": {"points": [..]}}}`
pub fn parse_geo_polygon(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    const KEY: &str = "geo_polygon";
    let object = expect_object(KEY, json)?;
    let (field, body) = geo_field(KEY, object, &["boost", "constant_score"])?;
    let body = expect_object(KEY, body)?;
    check_keys(KEY, body, &["points"])?;

    let points = body
        .get("points")
        .ok_or_else(|| PilumError::parse(format!("[{KEY}] missing [points]")))?;
    let points = expect_array(KEY, points)?
        .iter()
        .map(|point| parse_point(KEY, point))
        .collect::<Result<Vec<_>>>()?;

    let step = f
        .spatial()
        .within()
        .field(field)?
        .polygon(GeoPolygon::new(points)?)?;
    apply_score(KEY, step, Some(object))?.to_predicate()
}

/// `{"knn": {"field": "embedding", "query_vector": [..], "k": 10, "filter": ..}}`
pub fn parse_knn(f: &SearchPredicateFactory<'_>, json: &Value) -> Result<SearchPredicate> {
    const KEY: &str = "knn";
    let object = expect_object(KEY, json)?;
    check_keys(
        KEY,
        object,
        &[
            "field",
            "query_vector",
            "k",
            "filter",
            "similarity",
            "boost",
            "constant_score",
        ],
    )?;

    let field = object
        .get("field")
        .ok_or_else(|| PilumError::parse(format!("[{KEY}] missing [field]")))?;
    let k = object
        .get("k")
        .ok_or_else(|| PilumError::parse(format!("[{KEY}] missing [k]")))?;
    let k = usize::try_from(parse_integer("k", k)?)
        .map_err(|_| PilumError::parse(format!("[{KEY}] [k] must not be negative")))?;
    let vector = object
        .get("query_vector")
        .ok_or_else(|| PilumError::parse(format!("[{KEY}] missing [query_vector]")))?;
    let vector = expect_array("query_vector", vector)?
        .iter()
        .map(|x| parse_float("query_vector", x).map(|x| x as f32))
        .collect::<Result<Vec<_>>>()?;

    let mut step = f
        .knn(k)?
        .field(parse_string("field", field)?)?
        .matching(vector)?;
    if let Some(filter) = object.get("filter") {
        let filters: &[Value] = match filter {
            Value::Array(array) => array,
            single => std::slice::from_ref(single),
        };
        for filter in filters {
            step = step.filter(parse(f, filter))?;
        }
    }
    if let Some(similarity) = object.get("similarity") {
        step = step.required_minimum_similarity(parse_float("similarity", similarity)? as f32);
    }
    if let Some(boost) = optional_boost(KEY, Some(object))? {
        step = step.boost(boost);
    }
    if let Some(Value::Bool(true)) = object.get("constant_score") {
        step = step.constant_score();
    }
    step.to_predicate()
}
