use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    AllPlacesRequest, AmenityType, Coordinate, ErrorResponse, EvaluateRequest, EvaluateResponse,
    HealthResponse, PlacesQuery, PlacesResponse, StationsResponse, AllPlacesResponse,
};
use crate::routes::AppState;
use crate::services::fetch_many;

/// Radius for single-type place lookups, in meters
const PLACES_RADIUS_M: u32 = 2000;

/// Radius that covers the whole Baku metro network, in meters
const METRO_RADIUS_M: u32 = 20_000;

/// Types fetched by the all-places endpoint; `market` comes back as the supermarket alias
const ALL_PLACE_TYPES: [AmenityType; 8] = [
    AmenityType::School,
    AmenityType::Hospital,
    AmenityType::Supermarket,
    AmenityType::Cafe,
    AmenityType::Restaurant,
    AmenityType::Park,
    AmenityType::Gym,
    AmenityType::Pharmacy,
];

/// Configure location-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/evaluate", web::post().to(evaluate))
        .route("/places", web::get().to(get_places))
        .route("/all-places", web::post().to(get_all_places))
        .route("/metro-stations", web::get().to(get_metro_stations));
}

pub(crate) fn validation_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
        bounds: None,
    })
}

pub(crate) fn out_of_region(state: &AppState) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Location out of bounds".to_string(),
        message: "Location must be within the configured region".to_string(),
        status_code: 400,
        bounds: Some(state.region.bounds()),
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Grid evaluation endpoint
///
/// POST /api/evaluate
///
/// Request body:
/// ```json
/// {
///   "latitude": 40.4093,
///   "longitude": 49.8671,
///   "requirements": {"school": 3, "market": 2, "park": 1},
///   "grid_size": 5
/// }
/// ```
async fn evaluate(state: web::Data<AppState>, req: web::Json<EvaluateRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for evaluate request: {:?}", errors);
        return validation_error(errors.to_string());
    }

    let default = state.region.default_location();
    let center = Coordinate::new(
        req.latitude.unwrap_or(default.lat),
        req.longitude.unwrap_or(default.lon),
    );

    if !state.region.bounds().contains(center.lat, center.lon) {
        return out_of_region(&state);
    }

    tracing::info!("Received evaluation request for ({}, {})", center.lat, center.lon);

    let locations = state
        .evaluator
        .evaluate(center.lat, center.lon, &req.requirements, req.grid_size)
        .await;

    HttpResponse::Ok().json(EvaluateResponse { center, locations })
}

/// Nearby places of one type
///
/// GET /api/places?lat={lat}&lon={lon}&type={type}
async fn get_places(state: web::Data<AppState>, query: web::Query<PlacesQuery>) -> impl Responder {
    let default = state.region.default_location();
    let lat = query.lat.unwrap_or(default.lat);
    let lon = query.lon.unwrap_or(default.lon);
    let amenity = query
        .place_type
        .as_deref()
        .map_or(AmenityType::School, AmenityType::parse_lossy);

    let places = state.source.fetch_places(lat, lon, amenity, PLACES_RADIUS_M).await;

    HttpResponse::Ok().json(PlacesResponse {
        count: places.len(),
        places,
    })
}

/// Places of every scored type, for map overlays
///
/// POST /api/all-places
async fn get_all_places(state: web::Data<AppState>, req: web::Json<AllPlacesRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    let default = state.region.default_location();
    let center = Coordinate::new(
        req.latitude.unwrap_or(default.lat),
        req.longitude.unwrap_or(default.lon),
    );

    if !state.region.bounds().contains(center.lat, center.lon) {
        return HttpResponse::Ok().json(AllPlacesResponse {
            places: Default::default(),
            center,
            error: Some("Location outside region".to_string()),
        });
    }

    let cache = fetch_many(
        state.source.as_ref(),
        center.lat,
        center.lon,
        &ALL_PLACE_TYPES,
        req.radius,
        state.max_concurrent_fetches,
    )
    .await;

    HttpResponse::Ok().json(AllPlacesResponse {
        places: cache.into_map(),
        center,
        error: None,
    })
}

/// Every metro station in the city
///
/// GET /api/metro-stations
async fn get_metro_stations(state: web::Data<AppState>) -> impl Responder {
    let center = state.region.default_location();
    let stations = state
        .source
        .fetch_places(center.lat, center.lon, AmenityType::Metro, METRO_RADIUS_M)
        .await;

    tracing::debug!("Returning {} metro stations", stations.len());

    HttpResponse::Ok().json(StationsResponse {
        count: stations.len(),
        stations,
    })
}
