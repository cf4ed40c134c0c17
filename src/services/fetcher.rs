use crate::models::{AmenityType, PoiCache};
use crate::services::poi_source::PoiSource;
use futures_util::stream::{self, StreamExt};
use std::collections::BTreeSet;

/// Upper bound on simultaneous POI queries
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 5;

/// Fetch places for several amenity types concurrently
///
/// One query per distinct type, at most `max_concurrent` in flight. Returns
/// once every query has finished; a failed query leaves an empty list for its
/// own type only. Supermarket results are also exposed under `market`,
/// replacing any market query of the same batch.
pub async fn fetch_many(
    source: &dyn PoiSource,
    lat: f64,
    lon: f64,
    amenities: &[AmenityType],
    radius_m: u32,
    max_concurrent: usize,
) -> PoiCache {
    let unique: BTreeSet<AmenityType> = amenities.iter().copied().collect();

    let results: Vec<_> = stream::iter(unique)
        .map(|amenity| async move {
            let places = source.fetch_places(lat, lon, amenity, radius_m).await;
            (amenity, places)
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut cache = PoiCache::new();
    for (amenity, places) in results {
        cache.insert(amenity, places);
    }

    let supermarkets = cache.get(AmenityType::Supermarket).map(<[_]>::to_vec);
    if let Some(supermarkets) = supermarkets {
        cache.insert(AmenityType::Market, supermarkets);
    }

    cache
}
