use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::distance::Coordinates;
use super::nominatim::{GeoError, Geocoder};
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub u64);

/// A resolved place. Never modified after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub place_id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub display_name: String,
    /// Normalized place text this location was resolved from.
    pub query: String,
}

impl Location {
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

pub trait LocationRepository: Send + Sync {
    /// Fails with `Conflict` when a location for the same query exists.
    fn insert_location(&self, location: Location) -> Result<Location, RepositoryError>;
    fn fetch_location(&self, id: LocationId) -> Result<Option<Location>, RepositoryError>;
    fn find_location_by_query(&self, query: &str) -> Result<Option<Location>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static LOCATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_location_id() -> LocationId {
    LocationId(LOCATION_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Lowercased, whitespace-collapsed form used as the lookup key.
pub fn normalize_place_text(place_text: &str) -> String {
    place_text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Creates locations lazily: the first request for a place text resolves it
/// through the geocoder, later requests reuse the stored record.
pub struct LocationDirectory<R> {
    repository: Arc<R>,
    geocoder: Arc<dyn Geocoder>,
}

impl<R> LocationDirectory<R>
where
    R: LocationRepository + 'static,
{
    pub fn new(repository: Arc<R>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            repository,
            geocoder,
        }
    }

    pub fn geocoder(&self) -> &dyn Geocoder {
        self.geocoder.as_ref()
    }

    pub fn locate(&self, place_text: &str) -> Result<Location, LocateError> {
        let query = normalize_place_text(place_text);
        if let Some(existing) = self.repository.find_location_by_query(&query)? {
            return Ok(existing);
        }

        let place = self.geocoder.resolve(place_text)?;
        let location = Location {
            id: next_location_id(),
            place_id: place.place_id,
            latitude: place.latitude,
            longitude: place.longitude,
            name: place.name,
            display_name: place.display_name,
            query,
        };

        match self.repository.insert_location(location) {
            Ok(stored) => {
                info!(location = stored.id.0, place_id = stored.place_id, "location stored");
                Ok(stored)
            }
            // Someone resolved the same text first; theirs wins.
            Err(RepositoryError::Conflict) => self
                .repository
                .find_location_by_query(&normalize_place_text(place_text))?
                .ok_or(LocateError::Repository(RepositoryError::NotFound)),
            Err(other) => Err(other.into()),
        }
    }

    pub fn fetch(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        self.repository.fetch_location(id)
    }
}
