use geo::Polygon;

use super::Coordinate;
use crate::geometry::{Projection, ring_polygon};

/// One vertex of a geofence ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPoint {
    /// Bearing from the center in degrees, clockwise from north
    pub bearing: f64,
    pub projection: Projection,
}

impl RingPoint {
    pub fn coordinate(&self) -> Coordinate {
        self.projection.coordinate()
    }
}

/// Ordered ring of points at a fixed distance around a center
///
/// Points are stored in ascending bearing order starting at due north.
#[derive(Debug, Clone)]
pub struct GeofenceRing {
    pub center: Coordinate,
    pub radius_km: f64,
    pub points: Vec<RingPoint>,
}

impl GeofenceRing {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.points.iter().map(RingPoint::coordinate).collect()
    }

    /// Indices of points that fell back to the center coordinate
    pub fn degenerate_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.projection.is_degenerate())
            .map(|(i, _)| i)
            .collect()
    }

    /// Convert to a closed counterclockwise polygon (x = lon, y = lat)
    ///
    /// Longitudes are unwrapped around the center, so a ring crossing the
    /// antimeridian keeps its shape.
    pub fn to_polygon(&self) -> Polygon<f64> {
        ring_polygon(self.center, &self.coordinates())
    }
}
