use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::accounts::{Member, TrustLevel, UserId};
use crate::catalog::domain::{
    AdoptionNotice, Animal, AnimalId, NoticeId, NoticeStatus, Photo, PhotoId, Sex, SpeciesId,
};
use crate::catalog::{CatalogService, NoticeSubmission};
use crate::geo::directory::normalize_place_text;
use crate::geo::{GeoError, Geocoder, LocationDirectory, ResolvedPlace};
use crate::store::InMemoryStore;

/// Geocoder answering from a fixed table of places; anything else fails.
#[derive(Debug, Default)]
pub(super) struct PlaceTable {
    places: HashMap<String, (f64, f64)>,
}

impl PlaceTable {
    pub(super) fn with(mut self, place: &str, latitude: f64, longitude: f64) -> Self {
        self.places
            .insert(normalize_place_text(place), (latitude, longitude));
        self
    }
}

impl Geocoder for PlaceTable {
    fn resolve(&self, place_text: &str) -> Result<ResolvedPlace, GeoError> {
        let key = normalize_place_text(place_text);
        let (latitude, longitude) =
            self.places
                .get(&key)
                .copied()
                .ok_or_else(|| GeoError::LookupFailure {
                    query: place_text.to_string(),
                    reason: "no results".to_string(),
                })?;
        Ok(ResolvedPlace {
            place_id: key.len() as u64,
            osm_id: None,
            latitude,
            longitude,
            name: place_text.trim().to_string(),
            display_name: place_text.trim().to_string(),
        })
    }
}

pub(super) fn swabia() -> PlaceTable {
    PlaceTable::default()
        .with("Tübingen", 48.5216, 9.0576)
        .with("Stuttgart", 48.7758, 9.1829)
        .with("Berlin", 52.5200, 13.4050)
}

pub(super) type Service = CatalogService<InMemoryStore, InMemoryStore>;

pub(super) fn service_with(geocoder: impl Geocoder + 'static) -> (Service, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let directory = Arc::new(LocationDirectory::new(store.clone(), Arc::new(geocoder)));
    (CatalogService::new(store.clone(), directory), store)
}

pub(super) fn member(trust_level: TrustLevel) -> Member {
    Member {
        user: UserId(7),
        trust_level,
    }
}

pub(super) fn submission(name: &str, place: Option<&str>) -> NoticeSubmission {
    NoticeSubmission {
        name: name.to_string(),
        description: Some("Zwei verspielte Rattenböcke".to_string()),
        searching_since: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        group_only: false,
        further_information: None,
        organization: None,
        location_string: place.map(str::to_string),
    }
}

pub(super) fn photo(id: u64, title: &str) -> Photo {
    Photo {
        id: PhotoId(id),
        title: title.to_string(),
        alt_text: String::new(),
        storage_key: format!("images/{id}.jpg"),
        uploaded_by: UserId(7),
    }
}

pub(super) fn bare_notice(photos: Vec<Photo>) -> AdoptionNotice {
    AdoptionNotice {
        id: NoticeId(1),
        owner: UserId(7),
        name: "Max und Moritz".to_string(),
        description: None,
        created_at: NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date"),
        searching_since: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
        organization: None,
        further_information: None,
        group_only: false,
        photos,
        location: None,
        status: NoticeStatus::Active,
    }
}

pub(super) fn bare_animal(id: u64, photos: Vec<Photo>) -> Animal {
    Animal {
        id: AnimalId(id),
        notice: NoticeId(1),
        name: format!("Ratte {id}"),
        species: SpeciesId(1),
        sex: Sex::Male,
        date_of_birth: None,
        description: None,
        photos,
    }
}
