// Integration tests for Homescore

use actix_web::{test, web, App};
use homescore::config::RegionSettings;
use homescore::core::GridEvaluator;
use homescore::models::{AmenityRequirements, AmenityType, BoundingBox, Coordinate, Place};
use homescore::routes::{self, AppState};
use homescore::services::{fetch_many, HouseStore, OverpassClient, PoiSource};
use async_trait::async_trait;
use mockito::Matcher;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const BAKU_LAT: f64 = 40.4093;
const BAKU_LON: f64 = 49.8671;
const INTERPRETER: &str = "/api/interpreter";

fn overpass(server: &mockito::ServerGuard) -> OverpassClient {
    OverpassClient::new(
        format!("{}{}", server.url(), INTERPRETER),
        8,
        BoundingBox::AZERBAIJAN,
    )
    .unwrap()
}

fn schools_body() -> String {
    json!({
        "elements": [
            {"type": "node", "lat": 40.4100, "lon": 49.8671, "tags": {"amenity": "school", "name": "School 6"}},
            {"type": "node", "lat": 40.410001, "lon": 49.867101, "tags": {"amenity": "school", "name": "School 6"}},
            {"type": "node", "lat": 40.4300, "lon": 49.8700, "tags": {"amenity": "school"}}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_fetch_places_parses_and_dedupes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", INTERPRETER)
        .match_body(Matcher::Regex("school".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(schools_body())
        .expect(1)
        .create_async()
        .await;

    let client = overpass(&server);
    let places = client.fetch_places(BAKU_LAT, BAKU_LON, AmenityType::School, 1500).await;

    mock.assert_async().await;
    assert_eq!(places.len(), 2);
    assert_eq!(places[0].name, "School 6");
    assert_eq!(places[1].name, "School");
    assert_eq!(places[0].tags.get("amenity").map(String::as_str), Some("school"));
}

#[tokio::test]
async fn test_fetch_places_outside_region_skips_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", INTERPRETER)
        .with_status(200)
        .with_body(schools_body())
        .expect(0)
        .create_async()
        .await;

    let client = overpass(&server);
    // London
    let places = client.fetch_places(51.5074, -0.1278, AmenityType::School, 1500).await;

    assert!(places.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_places_failures_are_empty() {
    let mut server = mockito::Server::new_async().await;
    let error_mock = server
        .mock("POST", INTERPRETER)
        .match_body(Matcher::Regex("hospital".to_string()))
        .with_status(504)
        .expect(2)
        .create_async()
        .await;
    let garbage_mock = server
        .mock("POST", INTERPRETER)
        .match_body(Matcher::Regex("pharmacy".to_string()))
        .with_status(200)
        .with_body("<html>rate limited</html>")
        .create_async()
        .await;

    let client = overpass(&server);

    assert!(client.try_fetch(BAKU_LAT, BAKU_LON, AmenityType::Hospital, 2000).await.is_err());
    assert!(client.fetch_places(BAKU_LAT, BAKU_LON, AmenityType::Hospital, 2000).await.is_empty());
    assert!(client.fetch_places(BAKU_LAT, BAKU_LON, AmenityType::Pharmacy, 800).await.is_empty());

    error_mock.assert_async().await;
    garbage_mock.assert_async().await;
}

#[tokio::test]
async fn test_metro_stations_deduplicated_by_name() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "elements": [
            {"type": "node", "lat": 40.3800, "lon": 49.8100, "tags": {"railway": "station", "station": "subway", "name": "Memar Ajami"}},
            {"type": "way", "center": {"lat": 40.3805, "lon": 49.8105}, "tags": {"public_transport": "station", "station": "subway", "name": "Memar Əcəmi"}},
            {"type": "node", "lat": 40.4000, "lon": 49.8500, "tags": {"railway": "station", "station": "subway", "name": "Ağ şəhər"}},
            {"type": "node", "lat": 40.4100, "lon": 49.8600, "tags": {"railway": "station", "station": "subway", "name": "Sahil Metro"}}
        ]
    });
    let mock = server
        .mock("POST", INTERPRETER)
        .match_body(Matcher::Regex("subway".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = overpass(&server);
    let stations = client.fetch_places(BAKU_LAT, BAKU_LON, AmenityType::Metro, 20_000).await;

    mock.assert_async().await;
    let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Memar Əcəmi", "Sahil"]);
}

#[tokio::test]
async fn test_grid_fetches_once_per_type_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", INTERPRETER)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(schools_body())
        .expect(3)
        .create_async()
        .await;

    let source: Arc<dyn PoiSource> = Arc::new(overpass(&server));
    let evaluator = GridEvaluator::new(source, BoundingBox::AZERBAIJAN);
    let requirements = AmenityRequirements {
        school: 2.0,
        park: 1.0,
        supermarket: 1.0,
        ..Default::default()
    };

    let cells = evaluator.evaluate(BAKU_LAT, BAKU_LON, &requirements, 4).await;

    assert_eq!(cells.len(), 16);
    mock.assert_async().await;
}

/// In-memory source that counts lookups per amenity type
#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl PoiSource for CountingSource {
    async fn fetch_places(&self, lat: f64, lon: f64, amenity: AmenityType, _radius_m: u32) -> Vec<Place> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        vec![Place {
            name: format!("{} near center", amenity.title()),
            location: Coordinate::new(lat + 0.002, lon),
            tags: BTreeMap::new(),
        }]
    }
}

#[tokio::test]
async fn test_grid_batches_independent_of_size() {
    let requirements = AmenityRequirements {
        school: 1.0,
        hospital: 2.0,
        gym: 1.0,
        ..Default::default()
    };

    for grid_size in [1, 3, 7] {
        let source = Arc::new(CountingSource::default());
        let evaluator = GridEvaluator::new(source.clone(), BoundingBox::AZERBAIJAN);

        let cells = evaluator.evaluate(BAKU_LAT, BAKU_LON, &requirements, grid_size).await;

        assert_eq!(cells.len(), (grid_size * grid_size) as usize);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3, "grid size {}", grid_size);
        assert!(cells.iter().all(|c| (0.0..=100.0).contains(&c.score)));
    }
}

#[tokio::test]
async fn test_grid_scores_fall_off_with_distance() {
    let source = Arc::new(CountingSource::default());
    let evaluator = GridEvaluator::new(source, BoundingBox::AZERBAIJAN);
    let requirements = AmenityRequirements {
        school: 1.0,
        ..Default::default()
    };

    // The school sits ~220m north of the center; cell (3, 2) is ~0.9km away
    // and the south-west corner ~4.5km away
    let cells = evaluator.evaluate(BAKU_LAT, BAKU_LON, &requirements, 5).await;

    assert!(cells[3 * 5 + 2].score > 50.0, "score {}", cells[3 * 5 + 2].score);
    assert_eq!(cells[0].score, 0.0);
    assert!(cells.iter().all(|c| c.score < 100.0));
}

#[tokio::test]
async fn test_fetch_many_aliases_market() {
    let source = CountingSource::default();
    let cache = fetch_many(
        &source,
        BAKU_LAT,
        BAKU_LON,
        &[AmenityType::Supermarket, AmenityType::Cafe],
        2000,
        5,
    )
    .await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.get(AmenityType::Market), cache.get(AmenityType::Supermarket));
    assert!(cache.get(AmenityType::Market).is_some());
}

fn app_state(source: Arc<dyn PoiSource>, houses_file: std::path::PathBuf) -> AppState {
    AppState::new(
        source,
        Arc::new(HouseStore::new(houses_file)),
        RegionSettings::default(),
        5,
    )
}

#[actix_web::test]
async fn test_evaluate_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let state = app_state(Arc::new(CountingSource::default()), dir.path().join("houses.json"));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/evaluate")
        .set_json(json!({
            "latitude": BAKU_LAT,
            "longitude": BAKU_LON,
            "requirements": {"school": 1, "market": 1},
            "grid_size": 2
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["center"]["lat"], json!(BAKU_LAT));
    let locations = body["locations"].as_array().unwrap();
    assert_eq!(locations.len(), 4);
    assert!(locations[0]["amenities"]["supermarket"]["count"].as_u64().is_some());

    let req = test::TestRequest::post()
        .uri("/api/evaluate")
        .set_json(json!({"latitude": 51.5, "longitude": -0.12, "requirements": {"school": 1}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["bounds"]["min_lat"], json!(38.4));
}

#[actix_web::test]
async fn test_house_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let state = app_state(Arc::new(CountingSource::default()), dir.path().join("houses.json"));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    for (title, price) in [("Cheap flat", 80_000.0), ("Villa", 400_000.0)] {
        let req = test::TestRequest::post()
            .uri("/api/houses")
            .set_json(json!({
                "title": title,
                "address": "Baku",
                "latitude": BAKU_LAT,
                "longitude": BAKU_LON,
                "price": price,
                "description": "For sale"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let req = test::TestRequest::post()
        .uri("/api/houses")
        .set_json(json!({
            "title": "Abroad",
            "address": "Paris",
            "latitude": 48.8566,
            "longitude": 2.3522,
            "price": 1.0,
            "description": "Out of region"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get().uri("/api/houses").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["houses"][0]["quality_score"], json!(100.0));
    assert_eq!(body["houses"][1]["quality_score"], json!(0.0));
    assert_eq!(body["houses"][0]["seller_name"], json!("Anonymous"));

    let req = test::TestRequest::post()
        .uri("/api/houses/search")
        .set_json(json!({"max_price": 100000, "requirements": {"school": 1}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["houses"][0]["title"], json!("Cheap flat"));
    assert_eq!(body["houses"][0]["match_score"], json!(100.0));
    assert!(body["houses"][0]["amenities"]["metro"]["name"].is_string());
}

#[actix_web::test]
async fn test_out_of_range_weights_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(CountingSource::default());
    let state = app_state(source.clone(), dir.path().join("houses.json"));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    for requirements in [json!({"school": 1e308}), json!({"park": -1}), json!({"market": 1001})] {
        let req = test::TestRequest::post()
            .uri("/api/evaluate")
            .set_json(json!({"latitude": BAKU_LAT, "longitude": BAKU_LON, "requirements": requirements}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "evaluate with {}", requirements);

        let req = test::TestRequest::post()
            .uri("/api/houses/search")
            .set_json(json!({"requirements": requirements}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "search with {}", requirements);
    }

    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}
