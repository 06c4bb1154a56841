use super::domain::{
    AdoptionNotice, Animal, AnimalId, Comment, CommentId, NoticeId, OrganizationId,
    RescueOrganization, Species, SpeciesId,
};
use crate::repository::RepositoryError;

/// Storage abstraction for notices and everything hanging off them.
pub trait CatalogRepository: Send + Sync {
    fn insert_notice(&self, notice: AdoptionNotice) -> Result<AdoptionNotice, RepositoryError>;
    /// Stores a notice and its animals in one write; nothing is stored when
    /// any part is rejected. Animals must point at `notice`.
    fn insert_notice_with_animals(
        &self,
        notice: AdoptionNotice,
        animals: Vec<Animal>,
    ) -> Result<AdoptionNotice, RepositoryError>;
    fn update_notice(&self, notice: AdoptionNotice) -> Result<(), RepositoryError>;
    fn fetch_notice(&self, id: NoticeId) -> Result<Option<AdoptionNotice>, RepositoryError>;
    /// Removes the notice together with its animals and comments.
    fn delete_notice(&self, id: NoticeId) -> Result<(), RepositoryError>;
    /// All notices in creation order.
    fn list_notices(&self) -> Result<Vec<AdoptionNotice>, RepositoryError>;

    /// Fails with `NotFound` when the animal's notice does not exist.
    fn insert_animal(&self, animal: Animal) -> Result<Animal, RepositoryError>;
    fn update_animal(&self, animal: Animal) -> Result<(), RepositoryError>;
    fn fetch_animal(&self, id: AnimalId) -> Result<Option<Animal>, RepositoryError>;
    /// Animals of a notice in insertion order.
    fn animals_for_notice(&self, notice: NoticeId) -> Result<Vec<Animal>, RepositoryError>;

    fn insert_species(&self, species: Species) -> Result<Species, RepositoryError>;
    fn fetch_species(&self, id: SpeciesId) -> Result<Option<Species>, RepositoryError>;

    fn insert_organization(
        &self,
        organization: RescueOrganization,
    ) -> Result<RescueOrganization, RepositoryError>;
    fn fetch_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<RescueOrganization>, RepositoryError>;

    /// Fails with `NotFound` when the comment's notice does not exist.
    fn insert_comment(&self, comment: Comment) -> Result<Comment, RepositoryError>;
    fn fetch_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError>;
    fn comments_for_notice(&self, notice: NoticeId) -> Result<Vec<Comment>, RepositoryError>;
}
