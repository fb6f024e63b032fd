//! Geographical shapes used by spatial predicates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PilumError, Result};

/// A geographical point with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographical point.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(PilumError::invalid_argument(format!(
                "Invalid latitude: {lat} (must be between -90 and 90)"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(PilumError::invalid_argument(format!(
                "Invalid longitude: {lon} (must be between -180 and 180)"
            )));
        }

        Ok(GeoPoint { lat, lon })
    }

    /// Calculate the Haversine distance to another point in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_008.8;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// A geographical bounding box defined by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    /// Top-left corner
    pub top_left: GeoPoint,
    /// Bottom-right corner
    pub bottom_right: GeoPoint,
}

impl GeoBoundingBox {
    /// Create a new bounding box.
    pub fn new(top_left: GeoPoint, bottom_right: GeoPoint) -> Result<Self> {
        if top_left.lat < bottom_right.lat {
            return Err(PilumError::invalid_argument(
                "Top-left latitude must be greater than bottom-right latitude",
            ));
        }
        if top_left.lon > bottom_right.lon {
            return Err(PilumError::invalid_argument(
                "Top-left longitude must be less than bottom-right longitude",
            ));
        }

        Ok(GeoBoundingBox {
            top_left,
            bottom_right,
        })
    }

    /// Create a bounding box from its four coordinates.
    pub fn from_coordinates(top: f64, left: f64, bottom: f64, right: f64) -> Result<Self> {
        Self::new(GeoPoint::new(top, left)?, GeoPoint::new(bottom, right)?)
    }

    /// Check if a point is within this bounding box.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat <= self.top_left.lat
            && point.lat >= self.bottom_right.lat
            && point.lon >= self.top_left.lon
            && point.lon <= self.bottom_right.lon
    }
}

/// A closed polygon. The first and last points must be identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPolygon {
    points: Vec<GeoPoint>,
}

impl GeoPolygon {
    /// Create a polygon from its vertices.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self> {
        if points.len() < 4 {
            return Err(PilumError::invalid_argument(format!(
                "A polygon must have at least 4 points, got {}",
                points.len()
            )));
        }
        if points.first() != points.last() {
            return Err(PilumError::invalid_argument(
                "A polygon must be closed: the first and last points must be identical",
            ));
        }

        Ok(GeoPolygon { points })
    }

    /// The vertices, first point repeated last.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }
}

/// Distance units accepted by circle predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
    Yards,
    Feet,
    NauticalMiles,
}

impl DistanceUnit {
    /// Convert a distance in this unit to meters.
    pub fn to_meters(self, distance: f64) -> f64 {
        match self {
            DistanceUnit::Meters => distance,
            DistanceUnit::Kilometers => distance * 1_000.0,
            DistanceUnit::Miles => distance * 1_609.344,
            DistanceUnit::Yards => distance * 0.9144,
            DistanceUnit::Feet => distance * 0.3048,
            DistanceUnit::NauticalMiles => distance * 1_852.0,
        }
    }

    /// Parse a unit suffix as used in distance strings (`"10km"`).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" | "m" | "meters" => Some(DistanceUnit::Meters),
            "km" | "kilometers" => Some(DistanceUnit::Kilometers),
            "mi" | "miles" => Some(DistanceUnit::Miles),
            "yd" | "yards" => Some(DistanceUnit::Yards),
            "ft" | "feet" => Some(DistanceUnit::Feet),
            "nmi" | "NM" => Some(DistanceUnit::NauticalMiles),
            _ => None,
        }
    }
}

/// The shape a spatial predicate matches within.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoShape {
    /// Every point within `radius_meters` of `center`.
    Circle {
        center: GeoPoint,
        radius_meters: f64,
    },
    /// Every point inside the polygon.
    Polygon(GeoPolygon),
    /// Every point inside the bounding box.
    BoundingBox(GeoBoundingBox),
}

impl GeoShape {
    /// Create a circle, converting the radius to meters.
    pub fn circle(center: GeoPoint, radius: f64, unit: DistanceUnit) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(PilumError::invalid_argument(format!(
                "Invalid radius: {radius}. The radius must be positive or zero"
            )));
        }
        Ok(GeoShape::Circle {
            center,
            radius_meters: unit.to_meters(radius),
        })
    }
}

impl fmt::Display for GeoShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoShape::Circle {
                center,
                radius_meters,
            } => write!(f, "circle(center={center}, radius={radius_meters}m)"),
            GeoShape::Polygon(polygon) => {
                let points: Vec<String> = polygon.points().iter().map(|p| p.to_string()).collect();
                write!(f, "polygon({})", points.join(" "))
            }
            GeoShape::BoundingBox(bbox) => write!(
                f,
                "box(top_left={}, bottom_right={})",
                bbox.top_left, bbox.bottom_right
            ),
        }
    }
}
