use crate::models::{AddHouseRequest, House};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur with the listing file
#[derive(Debug, Error)]
pub enum HouseStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// House listings kept in a single JSON file
///
/// The whole array is read and written at once. Writers are serialized so two
/// concurrent adds cannot drop each other's listing; readers take no lock.
pub struct HouseStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HouseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every listing; a missing file is an empty list
    pub async fn load(&self) -> Result<Vec<House>, HouseStoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the full set next to the target and rename it into place, so
    /// readers see either the old file or the new one
    async fn save(&self, houses: &[House]) -> Result<(), HouseStoreError> {
        let json = serde_json::to_vec_pretty(houses)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Append a new listing and persist the full set
    pub async fn add(&self, request: AddHouseRequest) -> Result<House, HouseStoreError> {
        let _guard = self.write_lock.lock().await;

        let mut houses = self.load().await?;
        let id = houses.iter().map(|h| h.id).max().unwrap_or(0) + 1;

        let house = House {
            id,
            title: request.title,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
            price: request.price,
            description: request.description,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            area: request.area,
            seller_name: request.seller_name,
            seller_phone: request.seller_phone,
            created_at: chrono::Utc::now(),
            quality_score: None,
        };

        houses.push(house.clone());
        self.save(&houses).await?;

        tracing::info!("Stored house {} ({} listings)", house.id, houses.len());
        Ok(house)
    }
}
