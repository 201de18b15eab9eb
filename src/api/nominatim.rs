use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::thread;
use std::time::Duration;
use tracing::debug;

use geofence::Coordinate;

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("geofence/", env!("CARGO_PKG_VERSION"));
/// Nominatim usage policy: at most one request per second
const REQUEST_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Resolves place names to ring centers through the Nominatim search API
pub struct Geocoder {
    client: reqwest::blocking::Client,
}

impl Geocoder {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Look up the best match for "{city}, {country}"
    pub fn locate(&self, city: &str, country: &str) -> Result<Coordinate> {
        thread::sleep(REQUEST_INTERVAL);

        let query = format!("{}, {}", city, country);
        let body = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .context("Failed to reach Nominatim")?
            .error_for_status()
            .context("Nominatim rejected the search")?
            .text()
            .context("Failed to read Nominatim response")?;

        parse_search_response(&body).with_context(|| format!("Failed to geocode {}", query))
    }
}

fn parse_search_response(body: &str) -> Result<Coordinate> {
    let places: Vec<Place> =
        serde_json::from_str(body).context("Nominatim response is not a place list")?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No match found"))?;

    let lat: f64 = place.lat.parse().context("Invalid latitude in match")?;
    let lon: f64 = place.lon.parse().context("Invalid longitude in match")?;

    debug!("Matched {}", place.display_name);
    Ok(Coordinate::new(lat, lon))
}
