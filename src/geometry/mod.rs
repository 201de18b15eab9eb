pub mod destination;
pub mod polygon;
pub mod ring;

pub use destination::{EARTH_RADIUS_KM, Projection, project, project_with_radius};
pub use polygon::{ring_polygon, split_at_antimeridian};
pub use ring::{generate_default_ring, generate_ring};
