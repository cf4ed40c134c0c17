use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::models::domain::{AmenityType, BoundingBox, Coordinate, GridCell, House, Place, ScoredHouse};

/// Response for the grid evaluation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub center: Coordinate,
    pub locations: Vec<GridCell>,
}

/// Places of a single type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
    pub count: usize,
}

/// Places of every requested type around a center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllPlacesResponse {
    pub places: HashMap<AmenityType, Vec<Place>>,
    pub center: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metro stations in the region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<Place>,
    pub count: usize,
}

/// Listing collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousesResponse {
    pub houses: Vec<House>,
    pub count: usize,
}

/// Ranked search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHousesResponse {
    pub houses: Vec<ScoredHouse>,
    pub count: usize,
}

/// Newly created listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddHouseResponse {
    pub success: bool,
    pub house: House,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}
