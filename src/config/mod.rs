use serde::Deserialize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::domain::Coordinate;
use crate::error::GeofenceError;
use crate::output::OutputFormat;

pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_POINT_COUNT: usize = 36;
/// Smallest ring that still forms a polygon
pub const MIN_POINT_COUNT: usize = 3;

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}
fn default_point_count() -> usize {
    DEFAULT_POINT_COUNT
}

/// Ring generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeofenceConfig {
    /// Distance from the center to every ring point
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    /// Number of ring points (ring resolution)
    #[serde(default = "default_point_count")]
    pub point_count: usize,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            point_count: DEFAULT_POINT_COUNT,
        }
    }
}

impl GeofenceConfig {
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_point_count(mut self, point_count: usize) -> Self {
        self.point_count = point_count;
        self
    }

    /// Reject configurations that cannot describe a ring
    pub fn validate(&self) -> Result<(), GeofenceError> {
        if self.point_count < MIN_POINT_COUNT {
            return Err(GeofenceError::InvalidPointCount(self.point_count));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(GeofenceError::InvalidRadius(self.radius_km));
        }
        Ok(())
    }

    /// Angular step between consecutive ring points in degrees
    pub fn bearing_step(&self) -> f64 {
        360.0 / self.point_count as f64
    }
}

/// Settings read from a `geofence.toml` file
#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default = "default_point_count")]
    pub point_count: usize,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            lat: None,
            lon: None,
            city: None,
            country: None,
            radius_km: DEFAULT_RADIUS_KM,
            point_count: DEFAULT_POINT_COUNT,
            output: None,
            format: None,
        }
    }
}

impl FileConfig {
    /// Load the first parsable config file from the search path
    pub fn load() -> Option<Self> {
        Self::load_from_paths(&get_config_paths())
    }

    /// Read a config file the user pointed at explicitly
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn load_from_paths(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(path) else {
                continue;
            };
            match toml::from_str(&contents) {
                Ok(config) => return Some(config),
                Err(e) => {
                    warn!("Failed to parse config file {}: {}", path.display(), e);
                }
            }
        }
        None
    }

    pub fn geofence(&self) -> GeofenceConfig {
        GeofenceConfig {
            radius_km: self.radius_km,
            point_count: self.point_count,
        }
    }
}

/// Values given on the command line; `None` means the flag was not passed
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub radius_km: Option<f64>,
    pub point_count: Option<usize>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
}

/// Where the ring center comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CenterSource {
    Coordinate(Coordinate),
    /// Needs geocoding before a ring can be generated
    City { city: String, country: String },
}

/// Fully merged run settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub center: CenterSource,
    pub geofence: GeofenceConfig,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Merge command-line values over file values over defaults
///
/// Center precedence:
/// 1. `--lat`/`--lon`
/// 2. `--city` (with `--country`, or the file's country)
/// 3. file `lat`/`lon`
/// 4. file `city`/`country`
pub fn resolve_settings(cli: &CliOverrides, file: &FileConfig) -> Result<Settings> {
    let mut geofence = file.geofence();
    if let Some(radius_km) = cli.radius_km {
        geofence = geofence.with_radius_km(radius_km);
    }
    if let Some(point_count) = cli.point_count {
        geofence = geofence.with_point_count(point_count);
    }

    Ok(Settings {
        center: resolve_center(cli, file)?,
        geofence,
        format: cli.format.or(file.format).unwrap_or_default(),
        output: cli.output.clone().or_else(|| file.output.clone()),
    })
}

fn resolve_center(cli: &CliOverrides, file: &FileConfig) -> Result<CenterSource> {
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        return Ok(CenterSource::Coordinate(Coordinate::new(lat, lon)));
    }

    if cli.city.is_none() {
        if let (Some(lat), Some(lon)) = (file.lat, file.lon) {
            return Ok(CenterSource::Coordinate(Coordinate::new(lat, lon)));
        }
    }

    let city = cli.city.clone().or_else(|| file.city.clone());
    let country = cli.country.clone().or_else(|| file.country.clone());

    match (city, country) {
        (Some(city), Some(country)) => Ok(CenterSource::City { city, country }),
        (Some(_), None) => bail!("--city requires --country"),
        _ => bail!("Must provide either --lat and --lon, or --city/-c and --country/-C"),
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("geofence.toml"));
    paths.push(PathBuf::from(".geofence.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("geofence").join("config.toml"));
        paths.push(config_dir.join("geofence.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".geofence.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = GeofenceConfig::default();
        assert_eq!(config.radius_km, 10.0);
        assert_eq!(config.point_count, 36);
        assert!(config.validate().is_ok());
        assert_eq!(config.bearing_step(), 10.0);
    }

    #[test]
    fn test_validate_rejects_small_point_counts() {
        for n in 0..3 {
            let config = GeofenceConfig::default().with_point_count(n);
            assert_eq!(config.validate(), Err(GeofenceError::InvalidPointCount(n)));
        }
        assert!(GeofenceConfig::default().with_point_count(3).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        let config = GeofenceConfig::default().with_radius_km(0.0);
        assert_eq!(config.validate(), Err(GeofenceError::InvalidRadius(0.0)));
        assert!(
            GeofenceConfig::default()
                .with_radius_km(-2.5)
                .validate()
                .is_err()
        );
        assert!(
            GeofenceConfig::default()
                .with_radius_km(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_parse_file_config() {
        let toml_str = r#"
            lat = 25.1422131
            lon = 81.4358595
            radius_km = 5.0
            format = "geojson"
        "#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.lat, Some(25.1422131));
        assert_eq!(config.format, Some(OutputFormat::Geojson));
        assert_eq!(config.geofence().radius_km, 5.0);
        // Unset fields keep their defaults
        assert_eq!(config.geofence().point_count, 36);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_empty_file_config_matches_defaults() {
        let parsed: FileConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.geofence(), GeofenceConfig::default());
        assert_eq!(FileConfig::default().geofence(), GeofenceConfig::default());
    }

    #[test]
    fn test_load_skips_unparsable_files() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        let missing = dir.path().join("missing.toml");
        fs::write(&broken, "point_count = \"many\"").unwrap();
        fs::write(&good, "point_count = 12").unwrap();

        let config = FileConfig::load_from_paths(&[missing, broken, good]).unwrap();
        assert_eq!(config.point_count, 12);
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    fn file_with_center() -> FileConfig {
        toml::from_str(
            r#"
            lat = 25.1422131
            lon = 81.4358595
            city = "Prayagraj"
            country = "India"
            radius_km = 5.0
            point_count = 12
            format = "geojson"
            output = "file.json"
        "#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let cli = CliOverrides {
            lat: Some(1.0),
            lon: Some(2.0),
            ..Default::default()
        };
        let settings = resolve_settings(&cli, &FileConfig::default()).unwrap();

        assert_eq!(
            settings.center,
            CenterSource::Coordinate(Coordinate::new(1.0, 2.0))
        );
        assert_eq!(settings.geofence, GeofenceConfig::default());
        assert_eq!(settings.format, OutputFormat::Pairs);
        assert!(settings.output.is_none());
    }

    #[test]
    fn test_resolve_file_over_defaults() {
        let settings = resolve_settings(&CliOverrides::default(), &file_with_center()).unwrap();

        assert_eq!(
            settings.center,
            CenterSource::Coordinate(Coordinate::new(25.1422131, 81.4358595))
        );
        assert_eq!(settings.geofence.radius_km, 5.0);
        assert_eq!(settings.geofence.point_count, 12);
        assert_eq!(settings.format, OutputFormat::Geojson);
        assert_eq!(settings.output, Some(PathBuf::from("file.json")));
    }

    #[test]
    fn test_resolve_cli_over_file() {
        let cli = CliOverrides {
            lat: Some(-33.8688),
            lon: Some(151.2093),
            radius_km: Some(2.0),
            point_count: Some(8),
            format: Some(OutputFormat::Pairs),
            output: Some(PathBuf::from("cli.json")),
            ..Default::default()
        };
        let settings = resolve_settings(&cli, &file_with_center()).unwrap();

        assert_eq!(
            settings.center,
            CenterSource::Coordinate(Coordinate::new(-33.8688, 151.2093))
        );
        assert_eq!(
            settings.geofence,
            GeofenceConfig::default()
                .with_radius_km(2.0)
                .with_point_count(8)
        );
        assert_eq!(settings.format, OutputFormat::Pairs);
        assert_eq!(settings.output, Some(PathBuf::from("cli.json")));
    }

    #[test]
    fn test_resolve_cli_city_beats_file_coordinates() {
        let cli = CliOverrides {
            city: Some("Varanasi".to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&cli, &file_with_center()).unwrap();

        // Country falls back to the file
        assert_eq!(
            settings.center,
            CenterSource::City {
                city: "Varanasi".to_string(),
                country: "India".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_file_city_when_no_coordinates() {
        let file: FileConfig = toml::from_str("city = \"Prayagraj\"\ncountry = \"India\"").unwrap();
        let settings = resolve_settings(&CliOverrides::default(), &file).unwrap();

        assert_eq!(
            settings.center,
            CenterSource::City {
                city: "Prayagraj".to_string(),
                country: "India".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_city_without_country_is_rejected() {
        let cli = CliOverrides {
            city: Some("Varanasi".to_string()),
            ..Default::default()
        };
        let err = resolve_settings(&cli, &FileConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "--city requires --country");
    }

    #[test]
    fn test_resolve_without_center_is_rejected() {
        let err = resolve_settings(&CliOverrides::default(), &FileConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Must provide either"));
    }
}
