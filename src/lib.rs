//! Homescore - amenity proximity scoring for house hunting
//!
//! This library scores locations by how close they are to schools, hospitals,
//! shops and other amenities fetched from OpenStreetMap via the Overpass API,
//! and evaluates whole grids of locations with a single shared POI fetch.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{GridEvaluator, distance::{haversine_distance, in_bounds}, score_location};
pub use models::{AmenityRequirements, AmenityType, BoundingBox, GridCell, Place, PoiCache, ScoreResult};
pub use services::{OverpassClient, PoiSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        assert!(in_bounds(40.4093, 49.8671, &BoundingBox::AZERBAIJAN));
        assert_eq!(haversine_distance(40.0, 49.0, 40.0, 49.0), 0.0);
    }
}
