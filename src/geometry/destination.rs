use crate::domain::Coordinate;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Outcome of a single destination-point projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// The destination was computed normally
    Projected(Coordinate),
    /// The arcsine argument left [-1, 1]; carries the unchanged origin
    Degenerate { origin: Coordinate },
}

impl Projection {
    /// The resulting coordinate, falling back to the origin when degenerate
    pub fn coordinate(&self) -> Coordinate {
        match *self {
            Projection::Projected(c) => c,
            Projection::Degenerate { origin } => origin,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Projection::Degenerate { .. })
    }
}

/// Compute the destination point on the Earth sphere
///
/// # Arguments
/// * `lat`, `lon` - Origin in decimal degrees
/// * `bearing_deg` - Direction clockwise from true north
/// * `distance_km` - Great-circle distance to travel
pub fn project(lat: f64, lon: f64, bearing_deg: f64, distance_km: f64) -> Projection {
    project_with_radius(lat, lon, bearing_deg, distance_km, EARTH_RADIUS_KM)
}

/// Compute the destination point on a sphere of the given radius
///
/// # Algorithm
/// With angular distance δ = d / R:
/// - φ2 = asin(sin φ1 · cos δ + cos φ1 · sin δ · cos θ)
/// - λ2 = λ1 + atan2(sin θ · sin δ · cos φ1, cos δ − sin φ1 · sin φ2)
///
/// The resulting longitude is wrapped into [-180, 180).
pub fn project_with_radius(
    lat: f64,
    lon: f64,
    bearing_deg: f64,
    distance_km: f64,
    radius_km: f64,
) -> Projection {
    let origin = Coordinate::new(lat, lon);

    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let bearing_rad = bearing_deg.to_radians();
    let delta = distance_km / radius_km;

    let sin_arg = lat_rad.sin() * delta.cos() + lat_rad.cos() * delta.sin() * bearing_rad.cos();
    // NaN fails the range check too
    if !(-1.0..=1.0).contains(&sin_arg) {
        return Projection::Degenerate { origin };
    }
    let new_lat_rad = sin_arg.asin();

    let new_lon_rad = lon_rad
        + (bearing_rad.sin() * delta.sin() * lat_rad.cos())
            .atan2(delta.cos() - lat_rad.sin() * new_lat_rad.sin());

    let destination = Coordinate::new(
        new_lat_rad.to_degrees(),
        normalize_longitude(new_lon_rad.to_degrees()),
    );
    if !destination.is_finite() {
        return Projection::Degenerate { origin };
    }

    Projection::Projected(destination)
}

/// Wrap a longitude in degrees into [-180, 180)
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}

/// Shift `lon` by whole turns so it lies within 180° of `reference`
///
/// The result may fall outside [-180, 180]; used to keep polygon vertices
/// contiguous around a center near the antimeridian.
pub fn unwrap_longitude(lon: f64, reference: f64) -> f64 {
    reference + normalize_longitude(lon - reference)
}
