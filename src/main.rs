use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};

mod api;
mod logging;

use api::Geocoder;
use geofence::config::{CenterSource, CliOverrides, FileConfig, resolve_settings};
use geofence::output::{OutputFormat, encode, write_json};
use geofence::{generate_ring, validate_ring};

/// Generate a circular geofence ring around a coordinate
///
/// Examples:
///   # 36-point ring, 10 km around a coordinate, as [lat, lng] pairs
///   geofence --lat 25.1422131 --lon 81.4358595
///
///   # Coarser 5 km ring around a city, as GeoJSON
///   geofence -c "Prayagraj" -C "India" -r 5 -n 12 -f geojson -o ring.geojson
///
///   # Use a config file
///   geofence --config my-fence.toml
#[derive(Parser, Debug)]
#[command(name = "geofence")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches geofence.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Center latitude in decimal degrees (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Center longitude in decimal degrees (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// City name to geocode as the center (use with --country)
    #[arg(short = 'c', long, conflicts_with = "lat")]
    city: Option<String>,

    /// Country name for --city
    #[arg(short = 'C', long)]
    country: Option<String>,

    /// Ring radius in kilometers [default: 10]
    #[arg(short = 'r', long)]
    radius_km: Option<f64>,

    /// Number of points on the ring [default: 36]
    #[arg(short = 'n', long)]
    points: Option<usize>,

    /// Output format
    #[arg(short = 'f', long)]
    format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            lat: self.lat,
            lon: self.lon,
            city: self.city.clone(),
            country: self.country.clone(),
            radius_km: self.radius_km,
            point_count: self.points,
            format: self.format,
            output: self.output.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let file_config = match args.config {
        Some(ref path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            FileConfig::from_path(path)?
        }
        None => FileConfig::load().unwrap_or_default(),
    };

    let settings = resolve_settings(&args.overrides(), &file_config)?;

    let center = match settings.center {
        CenterSource::Coordinate(c) => c,
        CenterSource::City { city, country } => {
            info!("Geocoding {}, {}", city, country);
            let center = Geocoder::new()?.locate(&city, &country)?;
            info!("Geocoded center: {}", center);
            center
        }
    };
    debug!(
        "Center {}, radius {} km, {} points, format {:?}",
        center, settings.geofence.radius_km, settings.geofence.point_count, settings.format
    );

    let ring =
        generate_ring(center, &settings.geofence).context("Invalid geofence parameters")?;
    let validated = validate_ring(&ring);

    if validated.is_clean() {
        info!("{}", validated.summary());
    } else {
        warn!("{}", validated.summary());
    }

    let value = encode(settings.format, &ring, &validated)?;

    match settings.output {
        Some(path) => {
            write_json(&path, &value)?;
            info!("Wrote {} points to {}", validated.coordinates.len(), path.display());
        }
        None => {
            let text = serde_json::to_string_pretty(&value).context("Failed to serialize ring")?;
            println!("{}", text);
        }
    }

    Ok(())
}
