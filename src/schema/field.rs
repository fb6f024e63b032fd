//! Field descriptors for schema definition.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};
use crate::scope::keys;
use crate::value::FieldValue;

/// The type of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Analyzed full-text field.
    Text,
    /// Non-analyzed string field.
    Keyword,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point number.
    Float,
    /// true/false.
    Boolean,
    /// UTC timestamp.
    Date,
    /// Latitude/longitude pair.
    GeoPoint,
    /// Dense float vector.
    Vector,
    /// Object holding sub-fields.
    Object,
}

impl FieldKind {
    /// Get the name of this field type.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Keyword => "keyword",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::GeoPoint => "geo_point",
            FieldKind::Vector => "vector",
            FieldKind::Object => "object",
        }
    }

    /// Whether values of this type are strings.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Keyword)
    }

    /// Predicate kinds a searchable field of this type accepts.
    fn supported_predicates(&self) -> &'static [&'static str] {
        match self {
            FieldKind::Text => &[
                keys::MATCH_NAME,
                keys::PHRASE_NAME,
                keys::WILDCARD_NAME,
                keys::PREFIX_NAME,
                keys::REGEXP_NAME,
                keys::TERMS_NAME,
                keys::EXISTS_NAME,
                keys::SIMPLE_QUERY_STRING_NAME,
                keys::QUERY_STRING_NAME,
            ],
            FieldKind::Keyword => &[
                keys::MATCH_NAME,
                keys::RANGE_NAME,
                keys::WILDCARD_NAME,
                keys::PREFIX_NAME,
                keys::REGEXP_NAME,
                keys::TERMS_NAME,
                keys::EXISTS_NAME,
                keys::SIMPLE_QUERY_STRING_NAME,
                keys::QUERY_STRING_NAME,
            ],
            FieldKind::Integer | FieldKind::Float | FieldKind::Date => &[
                keys::MATCH_NAME,
                keys::RANGE_NAME,
                keys::TERMS_NAME,
                keys::EXISTS_NAME,
            ],
            FieldKind::Boolean => &[keys::MATCH_NAME, keys::TERMS_NAME, keys::EXISTS_NAME],
            FieldKind::GeoPoint => &[keys::SPATIAL_WITHIN_NAME, keys::EXISTS_NAME],
            FieldKind::Vector => &[keys::KNN_NAME, keys::EXISTS_NAME],
            FieldKind::Object => &[keys::EXISTS_NAME],
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Describes one field of an index schema, addressed by its absolute path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Absolute, dot-separated path of the field.
    path: String,
    /// The field type.
    kind: FieldKind,
    /// Analyzer name for text fields.
    analyzer: Option<String>,
    /// Whether the field is indexed for searching.
    searchable: bool,
    /// Number of dimensions of a vector field.
    dimension: Option<usize>,
    /// Whether an object field is stored as nested documents.
    nested: bool,
    /// Path of the innermost nested object containing this field.
    nested_path: Option<String>,
}

impl FieldDescriptor {
    /// Create a new searchable field descriptor.
    pub fn new<S: Into<String>>(path: S, kind: FieldKind) -> Self {
        FieldDescriptor {
            path: path.into(),
            kind,
            analyzer: None,
            searchable: true,
            dimension: None,
            nested: false,
            nested_path: None,
        }
    }

    /// Set the analyzer for this field.
    pub fn with_analyzer<S: Into<String>>(mut self, analyzer: S) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Set whether this field is indexed for searching.
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Set the dimension of a vector field.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Mark an object field as nested.
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub(crate) fn set_nested_path(&mut self, nested_path: Option<String>) {
        self.nested_path = nested_path;
    }

    /// Get the absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the field type.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Get the analyzer name.
    pub fn analyzer(&self) -> Option<&str> {
        self.analyzer.as_deref()
    }

    /// Check if this field is searchable.
    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Get the vector dimension.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Check if this is a nested object field.
    pub fn is_nested(&self) -> bool {
        self.kind == FieldKind::Object && self.nested
    }

    /// Get the path of the innermost enclosing nested object.
    pub fn nested_path(&self) -> Option<&str> {
        self.nested_path.as_deref()
    }

    /// Check whether the field accepts the given predicate kind.
    pub fn supports(&self, predicate: &str) -> bool {
        if predicate == keys::NESTED_NAME {
            return self.is_nested();
        }
        if !self.searchable {
            return predicate == keys::EXISTS_NAME;
        }
        self.kind.supported_predicates().contains(&predicate)
    }

    /// Every predicate kind the field accepts, for display.
    pub fn supported_predicates(&self) -> Vec<&'static str> {
        let mut predicates: Vec<&'static str> = if self.searchable {
            self.kind.supported_predicates().to_vec()
        } else {
            vec![keys::EXISTS_NAME]
        };
        if self.is_nested() {
            predicates.push(keys::NESTED_NAME);
        }
        predicates
    }

    /// Convert a predicate operand to this field's value type.
    pub fn convert(&self, value: FieldValue) -> Result<FieldValue> {
        let converted = match self.kind {
            FieldKind::Text | FieldKind::Keyword => {
                return Ok(match value {
                    FieldValue::Text(s) => FieldValue::Text(s),
                    other => FieldValue::Text(other.to_string()),
                });
            }
            FieldKind::Integer => match &value {
                FieldValue::Integer(i) => Some(FieldValue::Integer(*i)),
                FieldValue::Text(s) => s.trim().parse::<i64>().ok().map(FieldValue::Integer),
                _ => None,
            },
            FieldKind::Float => match &value {
                FieldValue::Text(s) => s.trim().parse::<f64>().ok().map(FieldValue::Float),
                other => other.as_float().map(FieldValue::Float),
            },
            FieldKind::Boolean => value.as_boolean().map(FieldValue::Boolean),
            FieldKind::Date => value.as_datetime().map(FieldValue::DateTime),
            FieldKind::GeoPoint | FieldKind::Vector | FieldKind::Object => None,
        };

        converted.ok_or_else(|| PilumError::ValueConversion {
            field: self.path.clone(),
            field_type: self.kind.type_name().to_string(),
            value: value.to_string(),
        })
    }
}
