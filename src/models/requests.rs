use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::AmenityRequirements;

/// Request to evaluate a grid around a location
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EvaluateRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(default)]
    #[validate(nested)]
    pub requirements: AmenityRequirements,
    #[serde(default = "default_grid_size")]
    #[validate(range(min = 1, max = 20))]
    pub grid_size: u32,
}

fn default_grid_size() -> u32 {
    5
}

/// Query string for a single-type place lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
}

/// Request for every scored amenity type around a point
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AllPlacesRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "default_places_radius")]
    #[validate(range(min = 1, max = 50000))]
    pub radius: u32,
}

pub(crate) fn default_places_radius() -> u32 {
    2000
}

/// Request from a seller to list a house
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddHouseRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub description: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub area: f64,
    #[serde(default = "crate::models::domain::default_seller_name")]
    pub seller_name: String,
    #[serde(default)]
    pub seller_phone: String,
}

/// Request from a buyer to search listings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchHousesRequest {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub min_price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    #[serde(default)]
    #[validate(nested)]
    pub requirements: AmenityRequirements,
}
