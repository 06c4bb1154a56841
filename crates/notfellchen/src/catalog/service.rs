use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    AdoptionNotice, Animal, AnimalId, Comment, CommentId, NoticeDetail, NoticeId, NoticeStatus,
    NoticeSummary, OrganizationId, Photo, PhotoId, RescueOrganization, Species, SpeciesId,
};
use super::forms::{
    clean_optional, AnimalSubmission, FormError, NewPhoto, NoticeSubmission,
    NoticeWithAnimalsSubmission, OrganizationSubmission,
};
use super::photos::resolve_primary_photo;
use super::repository::CatalogRepository;
use crate::accounts::{authorize, AuthorizationError, Capability, Member, UserId};
use crate::geo::{LocateError, Location, LocationDirectory, LocationId, LocationRepository};
use crate::repository::RepositoryError;

const MAX_COMMENT_LEN: usize = 2000;

static NOTICE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ANIMAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PHOTO_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SPECIES_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ORGANIZATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next(sequence: &AtomicU64) -> u64 {
    sequence.fetch_add(1, Ordering::Relaxed)
}

/// Filter for browsing active notices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text place to measure distances from.
    #[serde(default)]
    pub place: Option<String>,
    /// Only honored together with `place`.
    #[serde(default)]
    pub max_distance_km: Option<f64>,
}

/// Service composing form validation, the catalog repository and the
/// location directory.
pub struct CatalogService<C, L> {
    repository: Arc<C>,
    locations: Arc<LocationDirectory<L>>,
}

impl<C, L> CatalogService<C, L>
where
    C: CatalogRepository + 'static,
    L: LocationRepository + 'static,
{
    pub fn new(repository: Arc<C>, locations: Arc<LocationDirectory<L>>) -> Self {
        Self {
            repository,
            locations,
        }
    }

    pub fn register_species(&self, name: &str) -> Result<Species, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FormError::Missing("name").into());
        }
        let species = Species {
            id: SpeciesId(next(&SPECIES_SEQUENCE)),
            name: name.to_string(),
        };
        Ok(self.repository.insert_species(species)?)
    }

    /// Organizations need a resolvable location.
    pub fn register_organization(
        &self,
        submission: OrganizationSubmission,
    ) -> Result<RescueOrganization, CatalogError> {
        submission.validate()?;
        let location = self.locations.locate(&submission.location_string)?;

        let organization = RescueOrganization {
            id: OrganizationId(next(&ORGANIZATION_SEQUENCE)),
            name: submission.name.trim().to_string(),
            trusted: submission.trusted,
            location: location.id,
            instagram: clean_optional(submission.instagram),
            facebook: clean_optional(submission.facebook),
            fediverse_profile: clean_optional(submission.fediverse_profile),
            website: clean_optional(submission.website),
        };
        Ok(self.repository.insert_organization(organization)?)
    }

    /// Create a notice owned by `owner`. A place that cannot be resolved is
    /// dropped; the notice is still created.
    pub fn create_notice(
        &self,
        owner: &Member,
        submission: NoticeSubmission,
    ) -> Result<AdoptionNotice, CatalogError> {
        self.create_notice_on(owner, submission, Local::now().date_naive())
    }

    pub(crate) fn create_notice_on(
        &self,
        owner: &Member,
        submission: NoticeSubmission,
        today: NaiveDate,
    ) -> Result<AdoptionNotice, CatalogError> {
        let notice = self.build_notice(owner, submission, today)?;
        let stored = self.repository.insert_notice(notice)?;
        log_created(&stored, 0);
        Ok(stored)
    }

    fn build_notice(
        &self,
        owner: &Member,
        submission: NoticeSubmission,
        today: NaiveDate,
    ) -> Result<AdoptionNotice, CatalogError> {
        submission.validate()?;

        if let Some(organization) = submission.organization {
            if self.repository.fetch_organization(organization)?.is_none() {
                return Err(CatalogError::UnknownOrganization(organization));
            }
        }

        let location = match clean_optional(submission.location_string) {
            Some(place) => self.try_locate(&place)?,
            None => None,
        };

        let status = if owner
            .trust_level
            .allows(Capability::CreateActiveAdoptionNotice)
        {
            NoticeStatus::Active
        } else {
            NoticeStatus::AwaitingModeration
        };

        Ok(AdoptionNotice {
            id: NoticeId(next(&NOTICE_SEQUENCE)),
            owner: owner.user,
            name: submission.name.trim().to_string(),
            description: clean_optional(submission.description),
            created_at: today,
            searching_since: submission.searching_since,
            organization: submission.organization,
            further_information: clean_optional(submission.further_information),
            group_only: submission.group_only,
            photos: Vec::new(),
            location: location.map(|location| location.id),
            status,
        })
    }

    fn try_locate(&self, place: &str) -> Result<Option<Location>, CatalogError> {
        match self.locations.locate(place) {
            Ok(location) => Ok(Some(location)),
            Err(LocateError::Geo(err)) => {
                warn!(error = %err, "continuing without location");
                Ok(None)
            }
            Err(LocateError::Repository(err)) => Err(err.into()),
        }
    }

    /// Create a notice plus `num_animals` animals named after their species.
    /// The notice and its animals are stored together or not at all.
    pub fn create_notice_with_animals(
        &self,
        owner: &Member,
        submission: NoticeWithAnimalsSubmission,
    ) -> Result<NoticeDetail, CatalogError> {
        submission.validate()?;
        let species = self.species(submission.species)?;

        let notice = self.build_notice(owner, submission.notice, Local::now().date_naive())?;
        let animals = (1..=submission.num_animals)
            .map(|index| Animal {
                id: AnimalId(next(&ANIMAL_SEQUENCE)),
                notice: notice.id,
                name: format!("{} {}", species.name, index),
                species: species.id,
                sex: submission.sex,
                date_of_birth: submission.date_of_birth,
                description: None,
                photos: Vec::new(),
            })
            .collect();

        let stored = self
            .repository
            .insert_notice_with_animals(notice, animals)?;
        log_created(&stored, submission.num_animals);
        self.notice_detail(stored.id)
    }

    pub fn add_animal(
        &self,
        notice: NoticeId,
        submission: AnimalSubmission,
    ) -> Result<Animal, CatalogError> {
        submission.validate()?;
        self.notice(notice)?;
        let species = self.species(submission.species)?;

        let animal = Animal {
            id: AnimalId(next(&ANIMAL_SEQUENCE)),
            notice,
            name: submission.name.trim().to_string(),
            species: species.id,
            sex: submission.sex,
            date_of_birth: submission.date_of_birth,
            description: clean_optional(submission.description),
            photos: Vec::new(),
        };
        let stored = self.repository.insert_animal(animal)?;
        info!(notice = notice.0, animal = stored.id.0, "animal added");
        Ok(stored)
    }

    pub fn attach_notice_photo(
        &self,
        notice: NoticeId,
        uploaded_by: UserId,
        photo: NewPhoto,
    ) -> Result<Photo, CatalogError> {
        let photo = build_photo(uploaded_by, photo)?;
        let mut stored = self.notice(notice)?;
        stored.photos.push(photo.clone());
        self.repository.update_notice(stored)?;
        Ok(photo)
    }

    pub fn attach_animal_photo(
        &self,
        animal: AnimalId,
        uploaded_by: UserId,
        photo: NewPhoto,
    ) -> Result<Photo, CatalogError> {
        let photo = build_photo(uploaded_by, photo)?;
        let mut stored = self.animal(animal)?;
        stored.photos.push(photo.clone());
        self.repository.update_animal(stored)?;
        Ok(photo)
    }

    pub fn add_comment(
        &self,
        notice: NoticeId,
        author: UserId,
        text: &str,
    ) -> Result<Comment, CatalogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FormError::Missing("text").into());
        }
        if text.chars().count() > MAX_COMMENT_LEN {
            return Err(FormError::TooLong {
                field: "text",
                max: MAX_COMMENT_LEN,
            }
            .into());
        }
        self.notice(notice)?;

        let comment = Comment {
            id: CommentId(next(&COMMENT_SEQUENCE)),
            notice,
            author,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        Ok(self.repository.insert_comment(comment)?)
    }

    /// Publish a notice that is waiting for moderation.
    pub fn activate_notice(
        &self,
        actor: &Member,
        notice: NoticeId,
    ) -> Result<AdoptionNotice, CatalogError> {
        authorize(actor, Capability::AddModerationAction)?;
        let mut stored = self.notice(notice)?;
        if stored.status != NoticeStatus::Active {
            stored.status = NoticeStatus::Active;
            self.repository.update_notice(stored.clone())?;
            info!(notice = notice.0, actor = actor.user.0, "adoption notice activated");
        }
        Ok(stored)
    }

    pub fn notice_detail(&self, id: NoticeId) -> Result<NoticeDetail, CatalogError> {
        let notice = self.notice(id)?;
        let animals = self.repository.animals_for_notice(id)?;
        let comments = self.repository.comments_for_notice(id)?;
        let location = match notice.location {
            Some(location) => self.locations.fetch(location)?,
            None => None,
        };
        Ok(NoticeDetail {
            notice,
            animals,
            comments,
            location,
        })
    }

    pub fn notice(&self, id: NoticeId) -> Result<AdoptionNotice, CatalogError> {
        self.repository
            .fetch_notice(id)?
            .ok_or(CatalogError::NoticeNotFound(id))
    }

    pub fn animal(&self, id: AnimalId) -> Result<Animal, CatalogError> {
        self.repository
            .fetch_animal(id)?
            .ok_or(CatalogError::AnimalNotFound(id))
    }

    pub fn species(&self, id: SpeciesId) -> Result<Species, CatalogError> {
        self.repository
            .fetch_species(id)?
            .ok_or(CatalogError::UnknownSpecies(id))
    }

    /// Deletes the notice with its animals and comments.
    pub fn delete_notice(&self, id: NoticeId) -> Result<(), CatalogError> {
        match self.repository.delete_notice(id) {
            Ok(()) => {
                info!(notice = id.0, "adoption notice deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(CatalogError::NoticeNotFound(id)),
            Err(other) => Err(other.into()),
        }
    }

    /// Active notices, nearest first when a place is given. With a radius,
    /// notices without a location or farther away are left out.
    pub fn search(&self, query: SearchQuery) -> Result<Vec<NoticeSummary>, CatalogError> {
        let origin = match clean_optional(query.place) {
            Some(place) => Some(self.locations.locate(&place)?),
            None => None,
        };

        let mut results = Vec::new();
        for notice in self.repository.list_notices()? {
            if notice.status != NoticeStatus::Active {
                continue;
            }

            let distance_km = match (&origin, notice.location) {
                (Some(origin), Some(location)) => self
                    .location_of(location)?
                    .map(|location| origin.coordinates().distance_km(location.coordinates())),
                _ => None,
            };
            if origin.is_some() {
                if let Some(radius) = query.max_distance_km {
                    match distance_km {
                        Some(distance) if distance <= radius => {}
                        _ => continue,
                    }
                }
            }

            let animals = self.repository.animals_for_notice(notice.id)?;
            let primary_photo = resolve_primary_photo(&notice, &animals).cloned();
            results.push(NoticeSummary {
                notice,
                primary_photo,
                distance_km,
            });
        }

        // Stable: equal distances (and unlocated notices) keep creation order.
        results.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(left), Some(right)) => left.total_cmp(&right),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(results)
    }

    fn location_of(&self, id: LocationId) -> Result<Option<Location>, CatalogError> {
        Ok(self.locations.fetch(id)?)
    }
}

fn log_created(notice: &AdoptionNotice, animals: u8) {
    info!(
        notice = notice.id.0,
        owner = notice.owner.0,
        status = notice.status.label(),
        located = notice.location.is_some(),
        animals,
        "adoption notice created"
    );
}

fn build_photo(uploaded_by: UserId, photo: NewPhoto) -> Result<Photo, FormError> {
    photo.validate()?;
    Ok(Photo {
        id: PhotoId(next(&PHOTO_SEQUENCE)),
        title: photo.title.trim().to_string(),
        alt_text: photo.alt_text.trim().to_string(),
        storage_key: photo.storage_key.trim().to_string(),
        uploaded_by,
    })
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("species {0} does not exist")]
    UnknownSpecies(SpeciesId),
    #[error("organization {0} does not exist")]
    UnknownOrganization(OrganizationId),
    #[error("adoption notice {0} not found")]
    NoticeNotFound(NoticeId),
    #[error("animal {0} not found")]
    AnimalNotFound(AnimalId),
    #[error(transparent)]
    Location(#[from] LocateError),
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
