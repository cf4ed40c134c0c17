use crate::core::distance::{nearest, round2};
use crate::core::scoring::score_location;
use crate::models::{AmenityRequirements, AmenityType, House, NearbySummary, ScoredHouse};
use crate::services::PoiSource;
use futures_util::future::join_all;
use std::collections::BTreeMap;

/// Amenities summarised for every search result, with their lookup radius in meters
pub const HOUSE_AMENITY_RADII: [(AmenityType, u32); 4] = [
    (AmenityType::Hospital, 3000),
    (AmenityType::Police, 3000),
    (AmenityType::School, 2000),
    (AmenityType::Metro, 5000),
];

/// Fill in `quality_score` from the price spread of the whole set
///
/// The cheapest listing scores 100 and the most expensive 0. When every price
/// is equal the spread counts as 1, so all listings score 100.
pub fn apply_quality_scores(houses: &mut [House]) {
    let Some(min_price) = houses.iter().map(|h| h.price).reduce(f64::min) else {
        return;
    };
    let max_price = houses.iter().map(|h| h.price).fold(min_price, f64::max);

    let range = if max_price > min_price {
        max_price - min_price
    } else {
        1.0
    };

    for house in houses.iter_mut() {
        let score = 100.0 - (house.price - min_price) / range * 100.0;
        house.quality_score = Some(round2(score));
    }
}

/// Buyer search criteria
#[derive(Debug, Clone, Default)]
pub struct HouseSearch {
    pub min_price: f64,
    pub max_price: Option<f64>,
    pub requirements: AmenityRequirements,
}

impl HouseSearch {
    pub fn matches_price(&self, house: &House) -> bool {
        house.price >= self.min_price && self.max_price.map_or(true, |max| house.price <= max)
    }
}

async fn nearby_summary(
    source: &dyn PoiSource,
    house: &House,
    amenity: AmenityType,
    radius_m: u32,
) -> NearbySummary {
    let places = source
        .fetch_places(house.latitude, house.longitude, amenity, radius_m)
        .await;

    let count = (amenity != AmenityType::Metro).then_some(places.len());
    match nearest(house.latitude, house.longitude, &places) {
        Some((place, distance)) => NearbySummary {
            distance: Some(round2(distance)),
            name: Some(place.name.clone()),
            count,
        },
        None => NearbySummary {
            distance: None,
            name: None,
            count: count.map(|_| 0),
        },
    }
}

async fn score_house(source: &dyn PoiSource, house: House, requirements: &AmenityRequirements) -> ScoredHouse {
    let location = score_location(source, house.latitude, house.longitude, requirements, None).await;

    let house_ref = &house;
    let amenities: BTreeMap<AmenityType, NearbySummary> = join_all(HOUSE_AMENITY_RADII.iter().map(
        |&(amenity, radius_m)| async move {
            (amenity, nearby_summary(source, house_ref, amenity, radius_m).await)
        },
    ))
    .await
    .into_iter()
    .collect();

    ScoredHouse {
        house,
        match_score: location.score,
        amenities,
    }
}

/// Rank listings in the price range by how well their location fits
///
/// Each house is scored with direct POI lookups (no shared cache, since the
/// houses are scattered) and gets a summary of the nearest hospital, police
/// station, school and metro station. Results are sorted best first.
pub async fn search_houses(
    source: &dyn PoiSource,
    houses: Vec<House>,
    search: &HouseSearch,
) -> Vec<ScoredHouse> {
    let candidates: Vec<House> = houses
        .into_iter()
        .filter(|house| search.matches_price(house))
        .collect();

    tracing::info!("Scoring {} houses in price range", candidates.len());

    let mut scored = Vec::with_capacity(candidates.len());
    for house in candidates {
        scored.push(score_house(source, house, &search.requirements).await);
    }

    scored.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
}
