use crate::models::{AmenityType, BoundingBox, Coordinate, Place};
use crate::services::poi_source::PoiSource;
use crate::services::stations::{canonical_station_name, is_excluded_station};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use thiserror::Error;

/// Public Overpass instance used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "https://overpass.kumi.systems/api/interpreter";

/// Server-side and client-side query timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Errors that can occur when querying the Overpass API
#[derive(Debug, Error)]
pub enum PoiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Overpass returned status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Overpass API client
///
/// Translates amenity types into Overpass QL, runs the query and turns the
/// returned elements into deduplicated [`Place`]s. Points outside the
/// configured region never reach the network.
pub struct OverpassClient {
    endpoint: String,
    timeout_secs: u64,
    bounds: BoundingBox,
    client: Client,
}

impl OverpassClient {
    /// Create a new Overpass client
    pub fn new(endpoint: String, timeout_secs: u64, bounds: BoundingBox) -> Result<Self, PoiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("homescore/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint,
            timeout_secs,
            bounds,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch places of one amenity type around a point
    ///
    /// Unlike [`PoiSource::fetch_places`], failures are returned to the caller.
    pub async fn try_fetch(
        &self,
        lat: f64,
        lon: f64,
        amenity: AmenityType,
        radius_m: u32,
    ) -> Result<Vec<Place>, PoiError> {
        if !self.bounds.contains(lat, lon) {
            tracing::debug!("Skipping {} lookup outside region: ({}, {})", amenity, lat, lon);
            return Ok(Vec::new());
        }

        let query = build_query(amenity, lat, lon, radius_m, self.timeout_secs);
        tracing::debug!("Overpass query for {}: {}", amenity, query);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(format!("data={}", urlencoding::encode(&query)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PoiError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed: OverpassResponse = serde_json::from_str(&body)
            .map_err(|e| PoiError::InvalidResponse(e.to_string()))?;

        let places = collect_places(parsed.elements, amenity);
        tracing::debug!("Found {} {} places around ({}, {})", places.len(), amenity, lat, lon);

        Ok(places)
    }
}

#[async_trait]
impl PoiSource for OverpassClient {
    async fn fetch_places(
        &self,
        lat: f64,
        lon: f64,
        amenity: AmenityType,
        radius_m: u32,
    ) -> Vec<Place> {
        match self.try_fetch(lat, lon, amenity, radius_m).await {
            Ok(places) => places,
            Err(PoiError::RequestError(e)) if e.is_timeout() => {
                tracing::warn!("Timeout fetching {} from Overpass API", amenity);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Error fetching {} from Overpass API: {}", amenity, e);
                Vec::new()
            }
        }
    }
}

/// Build the Overpass QL query for one amenity type
///
/// Regular amenities only query nodes. Metro stations are often mapped as
/// ways, so those clauses also cover ways and rely on `out center`.
pub fn build_query(amenity: AmenityType, lat: f64, lon: f64, radius_m: u32, timeout_secs: u64) -> String {
    let around = format!("(around:{},{},{})", radius_m, lat, lon);
    let around = around.as_str();

    let clauses: Vec<String> = match amenity {
        AmenityType::Metro => {
            let filters = [
                r#"["railway"="station"]["station"="subway"]"#,
                r#"["public_transport"="station"]["station"="subway"]"#,
            ];
            filters
                .iter()
                .flat_map(|filter| {
                    ["node", "way"]
                        .into_iter()
                        .map(move |kind| format!("{}{}{};", kind, filter, around))
                })
                .collect()
        }
        _ => amenity
            .osm_tags()
            .iter()
            .map(|(key, value)| format!(r#"node["{}"="{}"]{};"#, key, value, around))
            .collect(),
    };

    format!(
        "[out:json][timeout:{}];({}); out center;",
        timeout_secs,
        clauses.join(" ")
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassCenter {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl OverpassElement {
    fn coordinate(&self) -> Option<Coordinate> {
        let (lat, lon) = match self.kind.as_str() {
            "node" => (self.lat, self.lon),
            "way" | "relation" => {
                let center = self.center.as_ref()?;
                (center.lat, center.lon)
            }
            _ => return None,
        };
        Some(Coordinate::new(lat?, lon?))
    }
}

/// Key for coordinate dedup, ~1.1m precision
fn coordinate_key(location: &Coordinate) -> (i64, i64) {
    (
        (location.lat * 100_000.0).round() as i64,
        (location.lon * 100_000.0).round() as i64,
    )
}

fn is_subway_station(tags: &BTreeMap<String, String>) -> bool {
    if tags.get("station").map(String::as_str) == Some("subway")
        || tags.get("railway").map(String::as_str) == Some("station")
    {
        return true;
    }

    tags.iter().any(|(key, value)| {
        let key = key.to_lowercase();
        let value = value.to_lowercase();
        ["subway", "metro"]
            .iter()
            .any(|word| key.contains(word) || value.contains(word))
    })
}

/// Turn raw elements into places, dropping duplicates
///
/// Elements are deduplicated by coordinate for every type. Metro results are
/// further filtered to subway stations, renamed to their reference spelling,
/// checked against the exclusion list and deduplicated by name.
pub(crate) fn collect_places(elements: Vec<OverpassElement>, amenity: AmenityType) -> Vec<Place> {
    let mut places = Vec::new();
    let mut seen_coords = HashSet::new();
    let mut seen_names = HashSet::new();

    for element in elements {
        let Some(location) = element.coordinate() else {
            continue;
        };

        if !seen_coords.insert(coordinate_key(&location)) {
            continue;
        }

        let tags = element.tags;
        let mut name = tags
            .get("name")
            .filter(|n| !n.is_empty())
            .or_else(|| tags.get("brand").filter(|b| !b.is_empty()))
            .cloned()
            .unwrap_or_else(|| amenity.title());

        if amenity == AmenityType::Metro {
            if !is_subway_station(&tags) {
                continue;
            }

            name = canonical_station_name(&name);
            if is_excluded_station(&name) {
                continue;
            }

            if !seen_names.insert(name.trim().to_lowercase()) {
                continue;
            }
        }

        places.push(Place {
            name,
            location,
            tags,
        });
    }

    places
}
