use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{apply_quality_scores, search_houses, HouseSearch};
use crate::models::{
    AddHouseRequest, AddHouseResponse, ErrorResponse, HousesResponse, SearchHousesRequest,
    SearchHousesResponse,
};
use crate::routes::locations::{out_of_region, validation_error};
use crate::routes::AppState;
use crate::services::HouseStoreError;

/// Configure listing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/houses", web::post().to(add_house))
        .route("/houses", web::get().to(get_houses))
        .route("/houses/search", web::post().to(search));
}

fn store_error(context: &str, e: HouseStoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: context.to_string(),
        message: e.to_string(),
        status_code: 500,
        bounds: None,
    })
}

/// Add a listing
///
/// POST /api/houses
///
/// Request body:
/// ```json
/// {
///   "title": "string",
///   "address": "string",
///   "latitude": 40.3777,
///   "longitude": 49.8520,
///   "price": 150000,
///   "description": "string",
///   "bedrooms": 2
/// }
/// ```
async fn add_house(state: web::Data<AppState>, req: web::Json<AddHouseRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    if !state.region.bounds().contains(req.latitude, req.longitude) {
        return out_of_region(&state);
    }

    match state.houses.add(req.into_inner()).await {
        Ok(house) => HttpResponse::Created().json(AddHouseResponse {
            success: true,
            house,
        }),
        Err(e) => store_error("Failed to save house", e),
    }
}

/// All listings with their quality scores
///
/// GET /api/houses
async fn get_houses(state: web::Data<AppState>) -> impl Responder {
    let mut houses = match state.houses.load().await {
        Ok(houses) => houses,
        Err(e) => return store_error("Failed to load houses", e),
    };

    apply_quality_scores(&mut houses);

    HttpResponse::Ok().json(HousesResponse {
        count: houses.len(),
        houses,
    })
}

/// Listings in a price range ranked by location fit
///
/// POST /api/houses/search
async fn search(state: web::Data<AppState>, req: web::Json<SearchHousesRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    let houses = match state.houses.load().await {
        Ok(houses) => houses,
        Err(e) => return store_error("Failed to load houses", e),
    };

    let req = req.into_inner();
    let criteria = HouseSearch {
        min_price: req.min_price,
        max_price: req.max_price,
        requirements: req.requirements,
    };

    let houses = search_houses(state.source.as_ref(), houses, &criteria).await;

    HttpResponse::Ok().json(SearchHousesResponse {
        count: houses.len(),
        houses,
    })
}
