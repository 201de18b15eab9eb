use thiserror::Error;

/// Input errors rejected before a ring is generated or encoded
#[derive(Debug, Error, PartialEq)]
pub enum GeofenceError {
    #[error("point count must be at least 3, got {0}")]
    InvalidPointCount(usize),

    #[error("radius must be a positive finite number of kilometers, got {0}")]
    InvalidRadius(f64),

    #[error("a polygon needs at least 3 valid points, only {0} survived validation")]
    TooFewPoints(usize),
}
