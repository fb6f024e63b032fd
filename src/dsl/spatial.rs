//! `spatial().within()` steps.

use crate::dsl::common::{MultiFieldMoreStep, MultiFieldOptionsStep, MultiFieldStep};
use crate::error::Result;
use crate::query::geo::SpatialWithinPredicateBuilder;
use crate::scope::{SearchIndexScope, keys};
use crate::spatial::{DistanceUnit, GeoBoundingBox, GeoPoint, GeoPolygon, GeoShape};

pub type SpatialWithinPredicateFieldStep<'s> = MultiFieldStep<'s, SpatialWithinPredicateBuilder>;
pub type SpatialWithinPredicateFieldMoreStep<'s> =
    MultiFieldMoreStep<'s, SpatialWithinPredicateBuilder>;
pub type SpatialWithinPredicateOptionsStep<'s> =
    MultiFieldOptionsStep<'s, SpatialWithinPredicateBuilder>;

/// Entry point of spatial predicates.
pub struct SpatialPredicateInitialStep<'s> {
    scope: &'s dyn SearchIndexScope,
    root: Option<String>,
}

impl<'s> SpatialPredicateInitialStep<'s> {
    pub(crate) fn new(scope: &'s dyn SearchIndexScope, root: Option<String>) -> Self {
        SpatialPredicateInitialStep { scope, root }
    }

    /// Match points within a shape.
    pub fn within(self) -> SpatialWithinPredicateFieldStep<'s> {
        MultiFieldStep::new(self.scope, keys::SPATIAL_WITHIN, self.root)
    }
}

impl<'s> MultiFieldMoreStep<'s, SpatialWithinPredicateBuilder> {
    /// Match points within `radius` of `center`.
    pub fn circle(
        self,
        center: GeoPoint,
        radius: f64,
        unit: DistanceUnit,
    ) -> Result<SpatialWithinPredicateOptionsStep<'s>> {
        self.shape(GeoShape::circle(center, radius, unit)?)
    }

    /// Match points within a closed polygon.
    pub fn polygon(self, polygon: GeoPolygon) -> Result<SpatialWithinPredicateOptionsStep<'s>> {
        self.shape(GeoShape::Polygon(polygon))
    }

    /// Match points within a bounding box.
    pub fn bounding_box(
        self,
        bounding_box: GeoBoundingBox,
    ) -> Result<SpatialWithinPredicateOptionsStep<'s>> {
        self.shape(GeoShape::BoundingBox(bounding_box))
    }

    fn shape(mut self, shape: GeoShape) -> Result<SpatialWithinPredicateOptionsStep<'s>> {
        self.state_mut()
            .for_each_builder(|builder| builder.within(shape.clone()));
        Ok(self.into_options())
    }
}
