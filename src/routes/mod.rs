// Route exports
pub mod houses;
pub mod locations;

use actix_web::web;
use std::sync::Arc;
use crate::config::RegionSettings;
use crate::core::GridEvaluator;
use crate::services::{HouseStore, PoiSource};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PoiSource>,
    pub evaluator: GridEvaluator,
    pub houses: Arc<HouseStore>,
    pub region: RegionSettings,
    pub max_concurrent_fetches: usize,
}

impl AppState {
    pub fn new(
        source: Arc<dyn PoiSource>,
        houses: Arc<HouseStore>,
        region: RegionSettings,
        max_concurrent_fetches: usize,
    ) -> Self {
        let evaluator = GridEvaluator::new(source.clone(), region.bounds())
            .with_max_concurrent(max_concurrent_fetches);

        Self {
            source,
            evaluator,
            houses,
            region,
            max_concurrent_fetches,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(locations::configure)
            .configure(houses::configure),
    );
}
