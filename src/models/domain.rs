use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use validator::Validate;

/// A point in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Azerbaijan, the region the service ships configured for
    pub const AZERBAIJAN: BoundingBox = BoundingBox {
        min_lat: 38.4,
        max_lat: 41.9,
        min_lon: 44.8,
        max_lon: 50.4,
    };

    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        crate::core::distance::in_bounds(lat, lon, self)
    }
}

/// Amenity categories known to the POI adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmenityType {
    School,
    Hospital,
    Supermarket,
    Market,
    Cafe,
    Restaurant,
    Park,
    Gym,
    Pharmacy,
    Metro,
    Police,
}

impl AmenityType {
    /// Types that take part in location scoring, in scoring order
    pub const SCORED: [AmenityType; 8] = [
        AmenityType::School,
        AmenityType::Hospital,
        AmenityType::Supermarket,
        AmenityType::Cafe,
        AmenityType::Restaurant,
        AmenityType::Park,
        AmenityType::Gym,
        AmenityType::Pharmacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AmenityType::School => "school",
            AmenityType::Hospital => "hospital",
            AmenityType::Supermarket => "supermarket",
            AmenityType::Market => "market",
            AmenityType::Cafe => "cafe",
            AmenityType::Restaurant => "restaurant",
            AmenityType::Park => "park",
            AmenityType::Gym => "gym",
            AmenityType::Pharmacy => "pharmacy",
            AmenityType::Metro => "metro",
            AmenityType::Police => "police",
        }
    }

    /// Parse a free-form type name; anything unrecognised is treated as a school
    pub fn parse_lossy(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "school" => AmenityType::School,
            "hospital" => AmenityType::Hospital,
            "supermarket" => AmenityType::Supermarket,
            "market" => AmenityType::Market,
            "cafe" => AmenityType::Cafe,
            "restaurant" => AmenityType::Restaurant,
            "park" => AmenityType::Park,
            "gym" => AmenityType::Gym,
            "pharmacy" => AmenityType::Pharmacy,
            "metro" => AmenityType::Metro,
            "police" => AmenityType::Police,
            other => {
                tracing::debug!("Unknown amenity type '{}', using school", other);
                AmenityType::School
            }
        }
    }

    /// OpenStreetMap tag pairs that identify this amenity
    pub fn osm_tags(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            AmenityType::School => &[("amenity", "school")],
            AmenityType::Hospital => &[("amenity", "hospital")],
            AmenityType::Supermarket => &[("shop", "supermarket")],
            AmenityType::Market => &[("shop", "supermarket"), ("amenity", "marketplace")],
            AmenityType::Cafe => &[("amenity", "cafe")],
            AmenityType::Restaurant => &[("amenity", "restaurant")],
            AmenityType::Park => &[("leisure", "park")],
            AmenityType::Gym => &[("leisure", "fitness_centre"), ("sport", "gym")],
            AmenityType::Pharmacy => &[("amenity", "pharmacy")],
            AmenityType::Metro => &[
                ("railway", "station"),
                ("station", "subway"),
                ("public_transport", "station"),
            ],
            AmenityType::Police => &[("amenity", "police")],
        }
    }

    /// Search radius in meters used when scoring, for scored types only
    pub fn search_radius_m(&self) -> Option<u32> {
        match self {
            AmenityType::School => Some(1500),
            AmenityType::Hospital => Some(2000),
            AmenityType::Supermarket => Some(1200),
            AmenityType::Cafe => Some(800),
            AmenityType::Restaurant => Some(1200),
            AmenityType::Park => Some(1500),
            AmenityType::Gym => Some(1500),
            AmenityType::Pharmacy => Some(800),
            AmenityType::Market | AmenityType::Metro | AmenityType::Police => None,
        }
    }

    /// Label used when a feature carries neither a name nor a brand
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for AmenityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point of interest returned by a POI query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub location: Coordinate,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Amenity weights for scoring; a weight of 0 means "not required"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AmenityRequirements {
    #[validate(range(min = 0.0, max = 1000.0))]
    pub school: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub hospital: f64,
    #[serde(rename = "market", alias = "supermarket")]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub supermarket: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub cafe: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub restaurant: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub park: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub gym: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub pharmacy: f64,
}

impl AmenityRequirements {
    pub fn weight(&self, amenity: AmenityType) -> f64 {
        match amenity {
            AmenityType::School => self.school,
            AmenityType::Hospital => self.hospital,
            AmenityType::Supermarket | AmenityType::Market => self.supermarket,
            AmenityType::Cafe => self.cafe,
            AmenityType::Restaurant => self.restaurant,
            AmenityType::Park => self.park,
            AmenityType::Gym => self.gym,
            AmenityType::Pharmacy => self.pharmacy,
            AmenityType::Metro | AmenityType::Police => 0.0,
        }
    }

    /// Scored amenity types with a positive weight, in scoring order
    pub fn required(&self) -> Vec<(AmenityType, f64)> {
        AmenityType::SCORED
            .iter()
            .map(|&amenity| (amenity, self.weight(amenity)))
            .filter(|(_, weight)| *weight > 0.0)
            .collect()
    }
}

/// POIs fetched once for one evaluation, keyed by amenity type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiCache {
    places: HashMap<AmenityType, Vec<Place>>,
}

impl PoiCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, amenity: AmenityType, places: Vec<Place>) {
        self.places.insert(amenity, places);
    }

    pub fn get(&self, amenity: AmenityType) -> Option<&[Place]> {
        self.places.get(&amenity).map(Vec::as_slice)
    }

    pub fn contains(&self, amenity: AmenityType) -> bool {
        self.places.contains_key(&amenity)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Total number of places across all amenity types
    pub fn total_places(&self) -> usize {
        self.places.values().map(Vec::len).sum()
    }

    pub fn into_map(self) -> HashMap<AmenityType, Vec<Place>> {
        self.places
    }
}

/// Nearest-match detail for one required amenity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmenityMatch {
    pub distance: Option<f64>,
    pub name: Option<String>,
    pub count: usize,
}

impl AmenityMatch {
    pub fn none() -> Self {
        Self {
            distance: None,
            name: None,
            count: 0,
        }
    }
}

/// Proximity score for a single location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub amenities: BTreeMap<AmenityType, AmenityMatch>,
}

/// One scored point of an evaluation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub lat: f64,
    pub lon: f64,
    pub score: f64,
    pub amenities: BTreeMap<AmenityType, AmenityMatch>,
}

/// A persisted house listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: u64,
    pub title: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub area: f64,
    #[serde(default = "default_seller_name")]
    pub seller_name: String,
    #[serde(default)]
    pub seller_phone: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Derived from the price spread of the full listing set, never stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

pub(crate) fn default_seller_name() -> String {
    "Anonymous".to_string()
}

/// Summary of the nearest place of one kind around a house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySummary {
    pub distance: Option<f64>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// A house ranked against a buyer's requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHouse {
    #[serde(flatten)]
    pub house: House,
    pub match_score: f64,
    pub amenities: BTreeMap<AmenityType, NearbySummary>,
}
