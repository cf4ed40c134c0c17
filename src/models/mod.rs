// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AmenityMatch, AmenityRequirements, AmenityType, BoundingBox, Coordinate, GridCell, House,
    NearbySummary, Place, PoiCache, ScoreResult, ScoredHouse,
};
pub use requests::{AddHouseRequest, AllPlacesRequest, EvaluateRequest, PlacesQuery, SearchHousesRequest};
pub use responses::{
    AddHouseResponse, AllPlacesResponse, ErrorResponse, EvaluateResponse, HealthResponse,
    HousesResponse, PlacesResponse, SearchHousesResponse, StationsResponse,
};
