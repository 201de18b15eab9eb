use geo::algorithm::orient::{Direction, Orient};
use geo::{BooleanOps, BoundingRect, LineString, MultiPolygon, Polygon, Rect, Translate};

use super::destination::unwrap_longitude;
use crate::domain::Coordinate;

/// Build a counterclockwise polygon (x = lon, y = lat) from ring vertices
///
/// Longitudes are unwrapped to stay within 180° of the center, so a ring
/// crossing the antimeridian stays contiguous (x may leave [-180, 180]).
pub fn ring_polygon(center: Coordinate, vertices: &[Coordinate]) -> Polygon<f64> {
    let exterior: LineString<f64> = vertices
        .iter()
        .map(|c| geo::coord! { x: unwrap_longitude(c.lon(), center.lon()), y: c.lat() })
        .collect();

    Polygon::new(exterior, Vec::new()).orient(Direction::Default)
}

/// Cut a polygon at the antimeridian into pieces within [-180, 180]
///
/// Polygons already inside that range come back as a single piece with
/// their vertex order untouched.
pub fn split_at_antimeridian(polygon: &Polygon<f64>) -> MultiPolygon<f64> {
    let Some(bounds) = polygon.bounding_rect() else {
        return MultiPolygon::new(Vec::new());
    };
    if bounds.min().x >= -180.0 && bounds.max().x <= 180.0 {
        return MultiPolygon::new(vec![polygon.clone()]);
    }

    let world = Rect::new(
        geo::coord! { x: -180.0, y: -90.0 },
        geo::coord! { x: 180.0, y: 90.0 },
    )
    .to_polygon();

    let mut pieces = Vec::new();
    for shift in [-360.0, 0.0, 360.0] {
        let shifted = polygon.translate(shift, 0.0);
        pieces.extend(shifted.intersection(&world).0);
    }

    MultiPolygon::new(pieces).orient(Direction::Default)
}
