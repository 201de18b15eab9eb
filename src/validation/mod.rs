//! Coordinate validation pass
//!
//! Runs after ring generation and before any output encoding:
//! - Detect missing latitude/longitude fields
//! - Reject values that are not numeric
//! - Reject NaN/Inf values
//!
//! Invalid entries are dropped from the output and reported one by one.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::domain::{Coordinate, GeofenceRing};

/// Which half of a coordinate a problem was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Latitude,
    Longitude,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Latitude => write!(f, "latitude"),
            Field::Longitude => write!(f, "longitude"),
        }
    }
}

/// Why a point was excluded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidCoordinate {
    #[error("{field} is missing")]
    Missing { field: Field },

    #[error("{field} is not numeric: {value}")]
    NonNumeric { field: Field, value: String },

    #[error("{field} is not a finite number")]
    NotANumber { field: Field },
}

/// A loosely typed field value as received by the validation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// A point before validation
///
/// Deserializes from `{"latitude": .., "longitude": ..}` objects where either
/// field may be absent, null, a number, or a numeric string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    #[serde(default)]
    pub latitude: Option<RawValue>,
    #[serde(default)]
    pub longitude: Option<RawValue>,
}

impl From<Coordinate> for RawPoint {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: Some(RawValue::Number(c.lat())),
            longitude: Some(RawValue::Number(c.lon())),
        }
    }
}

/// A point excluded by validation
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidPoint {
    /// Position of the point in the input sequence
    pub index: usize,
    pub reason: InvalidCoordinate,
}

/// Result of the validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidatedRing {
    /// Number of points inspected
    pub total: usize,
    /// Surviving coordinates in input order
    pub coordinates: Vec<Coordinate>,
    /// One entry per excluded point
    pub invalid: Vec<InvalidPoint>,
    /// Indices of points that fell back to the center during projection
    pub degenerate: Vec<usize>,
}

impl ValidatedRing {
    /// True when nothing was excluded or flagged
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.degenerate.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("Ring valid: {} points, no issues", self.total)
        } else {
            format!(
                "Ring issues: {} total, {} excluded, {} degenerate",
                self.total,
                self.invalid.len(),
                self.degenerate.len()
            )
        }
    }
}

/// Validate a sequence of raw points
///
/// Never fails: invalid points are excluded and reported, the rest pass
/// through in their original order.
pub fn validate_points(points: &[RawPoint]) -> ValidatedRing {
    let mut result = ValidatedRing {
        total: points.len(),
        ..Default::default()
    };

    for (index, point) in points.iter().enumerate() {
        match check_point(point) {
            Ok(c) => result.coordinates.push(c),
            Err(reason) => {
                warn!("Invalid coordinate at index {}: {}", index, reason);
                result.invalid.push(InvalidPoint { index, reason });
            }
        }
    }

    result
}

/// Validate a generated ring, also recording degenerate fallbacks
pub fn validate_ring(ring: &GeofenceRing) -> ValidatedRing {
    let raw: Vec<RawPoint> = ring.coordinates().into_iter().map(RawPoint::from).collect();

    let mut result = validate_points(&raw);
    result.degenerate = ring.degenerate_indices();
    result
}

fn check_point(point: &RawPoint) -> Result<Coordinate, InvalidCoordinate> {
    let lat = check_field(point.latitude.as_ref(), Field::Latitude)?;
    let lon = check_field(point.longitude.as_ref(), Field::Longitude)?;
    Ok(Coordinate::new(lat, lon))
}

fn check_field(value: Option<&RawValue>, field: Field) -> Result<f64, InvalidCoordinate> {
    let number = match value {
        None | Some(RawValue::Other(serde_json::Value::Null)) => {
            return Err(InvalidCoordinate::Missing { field });
        }
        Some(RawValue::Number(n)) => *n,
        // "NaN" and "inf" parse as floats but are not numeric text
        Some(RawValue::Text(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => {
                return Err(InvalidCoordinate::NonNumeric {
                    field,
                    value: s.clone(),
                });
            }
        },
        Some(RawValue::Other(v)) => {
            return Err(InvalidCoordinate::NonNumeric {
                field,
                value: v.to_string(),
            });
        }
    };

    if !number.is_finite() {
        return Err(InvalidCoordinate::NotANumber { field });
    }
    Ok(number)
}
