use crate::core::scoring::{required_types, score_location};
use crate::models::{AmenityRequirements, BoundingBox, GridCell};
use crate::services::{fetch_many, PoiSource, DEFAULT_MAX_CONCURRENT_FETCHES};
use std::sync::Arc;

/// Spacing between grid cells in degrees (~1.5km)
pub const GRID_STEP_DEG: f64 = 0.015;

/// Largest per-cell search radius the shared fetch must cover, in meters
pub const BASE_RADIUS_M: f64 = 1500.0;

/// Meters per degree of latitude, rounded
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Radius in meters that one fetch around the center needs to serve every cell
pub fn covering_radius_m(grid_size: u32) -> u32 {
    let radius = BASE_RADIUS_M + f64::from(grid_size) * GRID_STEP_DEG * METERS_PER_DEGREE / 2.0;
    radius as u32
}

/// Evaluates an N×N grid of locations around a center
///
/// # Pipeline Stages
/// 1. Region check on the center
/// 2. One parallel POI fetch per required amenity type, covering the whole grid
/// 3. Row-major scoring of every cell against the shared cache
#[derive(Clone)]
pub struct GridEvaluator {
    source: Arc<dyn PoiSource>,
    bounds: BoundingBox,
    max_concurrent: usize,
}

impl GridEvaluator {
    pub fn new(source: Arc<dyn PoiSource>, bounds: BoundingBox) -> Self {
        Self {
            source,
            bounds,
            max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Score every cell of a `grid_size` × `grid_size` grid centered on a point
    ///
    /// # Returns
    /// Exactly `grid_size²` cells in row-major order (latitude outer, longitude
    /// inner), or nothing when the center lies outside the region.
    pub async fn evaluate(
        &self,
        center_lat: f64,
        center_lon: f64,
        requirements: &AmenityRequirements,
        grid_size: u32,
    ) -> Vec<GridCell> {
        if !self.bounds.contains(center_lat, center_lon) {
            tracing::info!("Center ({}, {}) outside region, skipping evaluation", center_lat, center_lon);
            return Vec::new();
        }

        tracing::info!("Starting evaluation for {}x{} grid...", grid_size, grid_size);

        let amenities = required_types(requirements);
        let radius_m = covering_radius_m(grid_size);
        let cache = fetch_many(
            self.source.as_ref(),
            center_lat,
            center_lon,
            &amenities,
            radius_m,
            self.max_concurrent,
        )
        .await;

        tracing::info!(
            "Found POIs: {} total across {} types (radius {}m)",
            cache.total_places(),
            amenities.len(),
            radius_m
        );

        let half_span = f64::from(grid_size) * GRID_STEP_DEG / 2.0;
        let start_lat = center_lat - half_span;
        let start_lon = center_lon - half_span;

        let cell_count = (grid_size as usize).pow(2);
        tracing::info!("Evaluating {} locations...", cell_count);

        let mut cells = Vec::with_capacity(cell_count);
        for i in 0..grid_size {
            for j in 0..grid_size {
                let lat = start_lat + f64::from(i) * GRID_STEP_DEG;
                let lon = start_lon + f64::from(j) * GRID_STEP_DEG;

                let result =
                    score_location(self.source.as_ref(), lat, lon, requirements, Some(&cache)).await;

                cells.push(GridCell {
                    lat,
                    lon,
                    score: result.score,
                    amenities: result.amenities,
                });
            }
        }

        tracing::info!("Evaluation complete!");
        cells
    }
}

impl std::fmt::Debug for GridEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEvaluator")
            .field("bounds", &self.bounds)
            .field("max_concurrent", &self.max_concurrent)
            .finish_non_exhaustive()
    }
}
