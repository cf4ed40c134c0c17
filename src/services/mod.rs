// Service exports
pub mod fetcher;
pub mod houses;
pub mod overpass;
pub mod poi_source;
pub mod stations;

pub use fetcher::{fetch_many, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use houses::{HouseStore, HouseStoreError};
pub use overpass::{OverpassClient, PoiError};
pub use poi_source::PoiSource;
pub use stations::{canonical_station_name, is_excluded_station};
