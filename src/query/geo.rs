//! Spatial predicate builder for geo-point fields.

use crate::error::{PilumError, Result};
use crate::query::predicate::{PredicateKind, ScoreOptions, SearchPredicate};
use crate::query::query::SearchPredicateBuilder;
use crate::schema::field::FieldDescriptor;
use crate::spatial::GeoShape;

/// Builder for a predicate matching points within a shape.
#[derive(Debug, Clone)]
pub struct SpatialWithinPredicateBuilder {
    field: FieldDescriptor,
    shape: Option<GeoShape>,
    score: ScoreOptions,
}

impl SpatialWithinPredicateBuilder {
    /// Create a builder targeting the given field.
    pub fn new(field: FieldDescriptor) -> Self {
        SpatialWithinPredicateBuilder {
            field,
            shape: None,
            score: ScoreOptions::default(),
        }
    }

    /// Set the shape points must fall within.
    pub fn within(&mut self, shape: GeoShape) {
        self.shape = Some(shape);
    }
}

impl SearchPredicateBuilder for SpatialWithinPredicateBuilder {
    fn boost(&mut self, boost: f32) {
        self.score.boost = Some(boost);
    }

    fn constant_score(&mut self) {
        self.score.constant_score = true;
    }

    fn build(self) -> Result<SearchPredicate> {
        let shape = self.shape.ok_or_else(|| {
            PilumError::invalid_argument(format!("no shape for field '{}'", self.field.path()))
        })?;

        Ok(SearchPredicate::new(
            PredicateKind::Spatial {
                field: self.field.path().to_string(),
                shape,
            },
            self.score,
        ))
    }
}
