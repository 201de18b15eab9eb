pub mod coordinate;
pub mod ring;

pub use coordinate::Coordinate;
pub use ring::{GeofenceRing, RingPoint};
