// Core algorithm exports
pub mod distance;
pub mod grid;
pub mod listing;
pub mod scoring;

pub use distance::{haversine_distance, in_bounds, nearest, round2};
pub use grid::{covering_radius_m, GridEvaluator, GRID_STEP_DEG};
pub use listing::{apply_quality_scores, search_houses, HouseSearch};
pub use scoring::{proximity_factor, required_types, score_location};
