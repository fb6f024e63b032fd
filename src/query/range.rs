//! Range predicate builder and the [`Range`] operand type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;
use crate::value::FieldValue;

/// One side of a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound<T> {
    /// Inclusive bound.
    Included(T),
    /// Exclusive bound.
    Excluded(T),
    /// Unbounded (no limit).
    Unbounded,
}

impl<T> Bound<T> {
    /// Whether this side has no limit.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    /// Get the bound value.
    pub fn value(&self) -> Option<&T> {
        match self {
            Bound::Included(v) | Bound::Excluded(v) => Some(v),
            Bound::Unbounded => None,
        }
    }

    /// Convert the bound value, keeping the inclusion.
    pub fn try_map<U, F>(self, f: F) -> Result<Bound<U>>
    where
        F: FnOnce(T) -> Result<U>,
    {
        Ok(match self {
            Bound::Included(v) => Bound::Included(f(v)?),
            Bound::Excluded(v) => Bound::Excluded(f(v)?),
            Bound::Unbounded => Bound::Unbounded,
        })
    }
}

/// A range of values with independently inclusive or exclusive bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    lower: Bound<T>,
    upper: Bound<T>,
}

impl<T> Range<T> {
    /// Create a range from explicit bounds.
    pub fn new(lower: Bound<T>, upper: Bound<T>) -> Self {
        Range { lower, upper }
    }

    /// Create an inclusive range where `None` means unbounded.
    pub fn of(lower: Option<T>, upper: Option<T>) -> Self {
        Range {
            lower: lower.map_or(Bound::Unbounded, Bound::Included),
            upper: upper.map_or(Bound::Unbounded, Bound::Included),
        }
    }

    /// `lower <= value <= upper`.
    pub fn between(lower: T, upper: T) -> Self {
        Range::new(Bound::Included(lower), Bound::Included(upper))
    }

    /// `value >= lower`.
    pub fn at_least(lower: T) -> Self {
        Range::new(Bound::Included(lower), Bound::Unbounded)
    }

    /// `value > lower`.
    pub fn greater_than(lower: T) -> Self {
        Range::new(Bound::Excluded(lower), Bound::Unbounded)
    }

    /// `value <= upper`.
    pub fn at_most(upper: T) -> Self {
        Range::new(Bound::Unbounded, Bound::Included(upper))
    }

    /// `value < upper`.
    pub fn less_than(upper: T) -> Self {
        Range::new(Bound::Unbounded, Bound::Excluded(upper))
    }

    /// A range with no bound at all. Range predicates reject it.
    pub fn all() -> Self {
        Range::new(Bound::Unbounded, Bound::Unbounded)
    }

    /// Get the lower bound.
    pub fn lower(&self) -> &Bound<T> {
        &self.lower
    }

    /// Get the upper bound.
    pub fn upper(&self) -> &Bound<T> {
        &self.upper
    }

    /// Whether both bounds are unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_unbounded() && self.upper.is_unbounded()
    }

    /// Convert both bound values.
    pub fn try_map<U, F>(self, mut f: F) -> Result<Range<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        Ok(Range {
            lower: self.lower.try_map(&mut f)?,
            upper: self.upper.try_map(&mut f)?,
        })
    }
}

impl<T: Into<FieldValue>> Range<T> {
    /// Convert bound values to field values.
    pub fn into_values(self) -> Range<FieldValue> {
        let convert = |bound: Bound<T>| match bound {
            Bound::Included(v) => Bound::Included(v.into()),
            Bound::Excluded(v) => Bound::Excluded(v.into()),
            Bound::Unbounded => Bound::Unbounded,
        };
        Range {
            lower: convert(self.lower),
            upper: convert(self.upper),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Bound::Included(v) => write!(f, "[{v}")?,
            Bound::Excluded(v) => write!(f, "{{{v}")?,
            Bound::Unbounded => f.write_str("{*")?,
        }
        f.write_str(" TO ")?;
        match &self.upper {
            Bound::Included(v) => write!(f, "{v}]"),
            Bound::Excluded(v) => write!(f, "{v}}}"),
            Bound::Unbounded => f.write_str("*}"),
        }
    }
}

/// Builder for a range predicate on one field.
#[derive(Debug, Clone)]
pub struct RangePredicateBuilder {
    field: FieldDescriptor,
    range: Option<Range<FieldValue>>,
    score: ScoreOptions,
}

impl RangePredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        RangePredicateBuilder {
            field,
            range: None,
            score: ScoreOptions::default(),
        }
    }

    /// Get the target field.
    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    /// Set the range, converting bound values to the field type.
    pub fn range(&mut self, range: Range<FieldValue>) -> Result<()> {
        if range.is_unbounded() {
            return Err(PilumError::NullRange {
                fields: vec![self.field.path().to_string()],
            });
        }
        self.range = Some(range.try_map(|value| self.field.convert(value))?);
        Ok(())
    }
}

impl SearchPredicateBuilder for RangePredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let range = self.range.ok_or_else(|| {
            PilumError::invalid_argument(format!("no range for field '{}'", self.field.path()))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Range {
                field: self.field.path().to_string(),
                range,
            },
            self.score,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::FieldKind;

    #[test]
    fn test_range_rendering() {
        assert_eq!(Range::between(1, 5).to_string(), "[1 TO 5]");
        assert_eq!(Range::greater_than(1).to_string(), "{1 TO *}");
        assert_eq!(Range::less_than(5).to_string(), "{* TO 5}");
        assert_eq!(Range::of(Some(1), None).to_string(), "[1 TO *}");
    }

    #[test]
    fn test_range_builder_converts_values() {
        let mut builder = RangePredicateBuilder::new(FieldDescriptor::new("year", FieldKind::Integer));
        builder
            .range(Range::between("2000", "2010").into_values())
            .unwrap();

        let predicate = builder.build().unwrap();
        assert_eq!(predicate.to_string(), "year:[2000 TO 2010]");
    }

    #[test]
    fn test_null_range_rejected() {
        let mut builder = RangePredicateBuilder::new(FieldDescriptor::new("year", FieldKind::Integer));
        match builder.range(Range::<FieldValue>::of(None, None)) {
            Err(PilumError::NullRange { fields }) => assert_eq!(fields, vec!["year"]),
            other => panic!("Expected null range error, got {other:?}"),
        }
    }

    #[test]
    fn test_unconvertible_bound() {
        let mut builder = RangePredicateBuilder::new(FieldDescriptor::new("year", FieldKind::Integer));
        assert!(matches!(
            builder.range(Range::at_least("soon").into_values()),
            Err(PilumError::ValueConversion { .. })
        ));
    }
}
