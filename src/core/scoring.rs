use crate::core::distance::{nearest, round2};
use crate::models::{AmenityMatch, AmenityRequirements, AmenityType, PoiCache, ScoreResult};
use crate::services::PoiSource;
use std::collections::BTreeMap;

/// Distance in kilometers within which an amenity earns its full weight
pub const FULL_SCORE_DISTANCE_KM: f64 = 0.5;

/// Points each unit of weight is worth
const POINTS_PER_WEIGHT: f64 = 10.0;

/// Calculate the proximity factor (0-1) for the nearest amenity
///
/// Full score up to 500m, then linear decay to zero at the search radius.
/// When the radius is 500m or less there is no decay band: anything inside the
/// radius scores fully and anything beyond scores nothing.
#[inline]
pub fn proximity_factor(distance_km: f64, radius_km: f64) -> f64 {
    if radius_km <= FULL_SCORE_DISTANCE_KM {
        return if distance_km <= radius_km { 1.0 } else { 0.0 };
    }

    if distance_km <= FULL_SCORE_DISTANCE_KM {
        1.0
    } else if distance_km <= radius_km {
        1.0 - (distance_km - FULL_SCORE_DISTANCE_KM) / (radius_km - FULL_SCORE_DISTANCE_KM)
    } else {
        0.0
    }
}

/// Score a location (0-100) by its proximity to the required amenities
///
/// Places come from `cache` when it holds the amenity type, otherwise from a
/// direct `source` lookup at that type's search radius. Missing places simply
/// contribute nothing.
///
/// Scoring formula:
/// score = sum(weight * 10 * proximity) / sum(weight * 10) * 100
pub async fn score_location(
    source: &dyn PoiSource,
    lat: f64,
    lon: f64,
    requirements: &AmenityRequirements,
    cache: Option<&PoiCache>,
) -> ScoreResult {
    let mut score = 0.0;
    let mut max_score = 0.0;
    let mut amenities = BTreeMap::new();

    for (amenity, weight) in requirements.required() {
        let Some(radius_m) = amenity.search_radius_m() else {
            continue;
        };
        max_score += weight * POINTS_PER_WEIGHT;

        let fetched;
        let places = match cache.and_then(|c| c.get(amenity)) {
            Some(cached) => cached,
            None => {
                fetched = source.fetch_places(lat, lon, amenity, radius_m).await;
                fetched.as_slice()
            }
        };

        let Some((closest, distance_km)) = nearest(lat, lon, places) else {
            amenities.insert(amenity, AmenityMatch::none());
            continue;
        };

        let radius_km = f64::from(radius_m) / 1000.0;
        score += weight * POINTS_PER_WEIGHT * proximity_factor(distance_km, radius_km);

        amenities.insert(
            amenity,
            AmenityMatch {
                distance: Some(round2(distance_km)),
                name: Some(closest.name.clone()),
                count: places.len(),
            },
        );
    }

    let normalized = if max_score > 0.0 {
        (score / max_score) * 100.0
    } else {
        0.0
    };

    ScoreResult {
        score: round2(normalized),
        amenities,
    }
}

/// Amenity types a set of requirements needs fetched, in scoring order
pub fn required_types(requirements: &AmenityRequirements) -> Vec<AmenityType> {
    requirements
        .required()
        .into_iter()
        .map(|(amenity, _)| amenity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Place};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LAT: f64 = 40.4093;
    const LON: f64 = 49.8671;

    /// Source with no places that counts its lookups
    #[derive(Default)]
    struct NoSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PoiSource for NoSource {
        async fn fetch_places(&self, _: f64, _: f64, _: AmenityType, _: u32) -> Vec<Place> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    /// A place `km` kilometers due north of the test point
    fn place_north(name: &str, km: f64) -> Place {
        Place {
            name: name.to_string(),
            location: Coordinate::new(LAT + km / 111.195, LON),
            tags: Default::default(),
        }
    }

    #[test]
    fn test_proximity_factor() {
        assert_eq!(proximity_factor(0.2, 1.5), 1.0);
        assert_eq!(proximity_factor(0.5, 1.5), 1.0);
        assert!((proximity_factor(1.0, 1.5) - 0.5).abs() < 1e-12);
        assert_eq!(proximity_factor(1.5, 1.5), 0.0);
        assert_eq!(proximity_factor(2.0, 1.5), 0.0);
    }

    #[test]
    fn test_proximity_factor_small_radius() {
        assert_eq!(proximity_factor(0.3, 0.4), 1.0);
        assert_eq!(proximity_factor(0.45, 0.4), 0.0);
        assert_eq!(proximity_factor(0.5, 0.5), 1.0);
    }

    #[tokio::test]
    async fn test_score_full_when_close() {
        let source = NoSource::default();
        let mut cache = PoiCache::new();
        cache.insert(AmenityType::School, vec![place_north("School 6", 0.3)]);

        let requirements = AmenityRequirements {
            school: 1.0,
            ..Default::default()
        };

        let result = score_location(&source, LAT, LON, &requirements, Some(&cache)).await;

        assert_eq!(result.score, 100.0);
        let school = &result.amenities[&AmenityType::School];
        assert_eq!(school.name.as_deref(), Some("School 6"));
        assert_eq!(school.distance, Some(0.3));
        assert_eq!(school.count, 1);
        assert!(!result.amenities.contains_key(&AmenityType::Hospital));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_score_zero_without_requirements() {
        let source = NoSource::default();
        let result = score_location(&source, LAT, LON, &AmenityRequirements::default(), None).await;

        assert_eq!(result.score, 0.0);
        assert!(result.amenities.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_score_fetches_when_not_cached() {
        let source = NoSource::default();
        let requirements = AmenityRequirements {
            cafe: 2.0,
            gym: 1.0,
            ..Default::default()
        };

        let result = score_location(&source, LAT, LON, &requirements, None).await;

        assert_eq!(result.score, 0.0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.amenities[&AmenityType::Cafe], AmenityMatch::none());
    }

    #[tokio::test]
    async fn test_score_weighted_mix() {
        let source = NoSource::default();
        let mut cache = PoiCache::new();
        cache.insert(AmenityType::School, vec![place_north("near", 0.1)]);
        cache.insert(AmenityType::Park, vec![place_north("far", 5.0)]);

        let requirements = AmenityRequirements {
            school: 3.0,
            park: 1.0,
            ..Default::default()
        };

        let result = score_location(&source, LAT, LON, &requirements, Some(&cache)).await;

        // 30 of 40 points
        assert_eq!(result.score, 75.0);
    }
}
