use anyhow::{Context, Result};
use clap::ValueEnum;
use geo::Polygon;
use serde::Deserialize;
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::MIN_POINT_COUNT;
use crate::domain::GeofenceRing;
use crate::error::GeofenceError;
use crate::geometry::{ring_polygon, split_at_antimeridian};
use crate::validation::ValidatedRing;

/// Serialization format for a validated ring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of [lat, lng] pairs
    #[default]
    Pairs,
    /// GeoJSON Feature with a counterclockwise Polygon in [lng, lat] order
    Geojson,
}

/// Encode surviving coordinates as `[[lat, lng], ...]`
pub fn to_pairs_json(validated: &ValidatedRing) -> Value {
    Value::Array(
        validated
            .coordinates
            .iter()
            .map(|c| json!([c.lat(), c.lon()]))
            .collect(),
    )
}

/// Encode surviving coordinates as a GeoJSON polygon feature
///
/// GeoJSON positions are `[lng, lat]`, exterior rings run counterclockwise
/// and repeat their first position at the end. A ring crossing the
/// antimeridian is cut into a `MultiPolygon` so every longitude stays in
/// [-180, 180].
///
/// # Errors
/// Fewer than 3 surviving points cannot form a polygon.
pub fn to_geojson(ring: &GeofenceRing, validated: &ValidatedRing) -> Result<Value, GeofenceError> {
    let coords = &validated.coordinates;
    if coords.len() < MIN_POINT_COUNT {
        return Err(GeofenceError::TooFewPoints(coords.len()));
    }

    let polygon = ring_polygon(ring.center, coords);
    let pieces = split_at_antimeridian(&polygon);

    let geometry = match pieces.0.as_slice() {
        [single] => json!({
            "type": "Polygon",
            "coordinates": polygon_rings(single),
        }),
        many => json!({
            "type": "MultiPolygon",
            "coordinates": many.iter().map(polygon_rings).collect::<Vec<_>>(),
        }),
    };

    Ok(json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "center": [ring.center.lat(), ring.center.lon()],
            "radius_km": ring.radius_km,
            "point_count": coords.len(),
            "excluded_points": validated.invalid.len(),
        },
    }))
}

fn polygon_rings(polygon: &Polygon<f64>) -> Value {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|line| {
            line.coords()
                .map(|c| json!([c.x, c.y]))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Encode a ring in the requested format
pub fn encode(
    format: OutputFormat,
    ring: &GeofenceRing,
    validated: &ValidatedRing,
) -> Result<Value, GeofenceError> {
    match format {
        OutputFormat::Pairs => Ok(to_pairs_json(validated)),
        OutputFormat::Geojson => to_geojson(ring, validated),
    }
}

/// Write pretty-printed JSON to a file
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value).context("Failed to serialize ring")?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
