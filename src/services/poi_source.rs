use async_trait::async_trait;
use crate::models::{AmenityType, Place};

/// Source of points of interest around a location
///
/// Implementations never fail: transport or parsing problems are logged and
/// reported as an empty list, which callers treat as "nothing nearby".
#[async_trait]
pub trait PoiSource: Send + Sync {
    async fn fetch_places(
        &self,
        lat: f64,
        lon: f64,
        amenity: AmenityType,
        radius_m: u32,
    ) -> Vec<Place>;
}
