//! geofence - Generate circular geofence rings around a coordinate

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod output;
pub mod validation;

pub use config::GeofenceConfig;
pub use domain::{Coordinate, GeofenceRing, RingPoint};
pub use error::GeofenceError;
pub use geometry::{Projection, generate_default_ring, generate_ring, project};
pub use validation::{ValidatedRing, validate_points, validate_ring};
