//! Adoption notices, their animals, photos and comments.

pub mod domain;
pub mod forms;
pub mod photos;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdoptionNotice, Animal, AnimalId, Comment, CommentId, NoticeDetail, NoticeId, NoticeStatus,
    NoticeSummary, OrganizationId, Photo, PhotoId, RescueOrganization, Sex, Species, SpeciesId,
};
pub use forms::{
    AnimalSubmission, FormError, NewPhoto, NoticeSubmission, NoticeWithAnimalsSubmission,
    OrganizationSubmission, MAX_ANIMALS_PER_NOTICE,
};
pub use photos::{resolve_photos, resolve_primary_photo};
pub use repository::CatalogRepository;
pub use service::{CatalogError, CatalogService, SearchQuery};
