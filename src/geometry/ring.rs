use tracing::{debug, warn};

use super::destination::project;
use crate::config::GeofenceConfig;
use crate::domain::{Coordinate, GeofenceRing, RingPoint};
use crate::error::GeofenceError;

/// Generate a geofence ring around `center`
///
/// # Algorithm
/// For i in 0..N the point at bearing i * (360 / N) is projected
/// `radius_km` away from the center. Points keep ascending bearing order,
/// starting due north.
///
/// Degenerate projections stay in the ring as the center coordinate and are
/// logged, so the ring always holds exactly N points.
///
/// # Errors
/// Rejects the configuration before projecting anything if the point count
/// is below 3 or the radius is not a positive finite number.
pub fn generate_ring(
    center: Coordinate,
    config: &GeofenceConfig,
) -> Result<GeofenceRing, GeofenceError> {
    config.validate()?;
    Ok(build_ring(center, config))
}

/// Generate a ring with the default 10 km radius and 36 points
pub fn generate_default_ring(center: Coordinate) -> GeofenceRing {
    build_ring(center, &GeofenceConfig::default())
}

fn build_ring(center: Coordinate, config: &GeofenceConfig) -> GeofenceRing {
    let step = config.bearing_step();

    let points: Vec<RingPoint> = (0..config.point_count)
        .map(|i| {
            let bearing = step * i as f64;
            let projection = project(center.lat(), center.lon(), bearing, config.radius_km);
            if projection.is_degenerate() {
                warn!(
                    "Degenerate projection at bearing {:.2}° from {}, using center coordinate",
                    bearing, center
                );
            }
            RingPoint {
                bearing,
                projection,
            }
        })
        .collect();

    debug!(
        "Generated {} ring points at {} km around {}",
        points.len(),
        config.radius_km,
        center
    );

    GeofenceRing {
        center,
        radius_km: config.radius_km,
        points,
    }
}
