//! In-memory implementation of every repository trait. All tables sit behind
//! one mutex so multi-table writes (accounts, notices with their animals,
//! cascading deletes, moderation actions) are atomic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::accounts::{AccountRepository, Member, User, UserId};
use crate::catalog::{
    AdoptionNotice, Animal, AnimalId, CatalogRepository, Comment, CommentId, NoticeId,
    OrganizationId, RescueOrganization, Species, SpeciesId,
};
use crate::geo::{Location, LocationId, LocationRepository};
use crate::moderation::{
    ModerationAction, ModerationRepository, Report, ReportId, ReportStatus, Rule, RuleId,
};
use crate::repository::RepositoryError;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    members: HashMap<UserId, Member>,
    notices: Vec<AdoptionNotice>,
    animals: Vec<Animal>,
    species: HashMap<SpeciesId, Species>,
    organizations: HashMap<OrganizationId, RescueOrganization>,
    comments: Vec<Comment>,
    locations: Vec<Location>,
    rules: HashMap<RuleId, Rule>,
    reports: Vec<Report>,
    actions: Vec<ModerationAction>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    /// Number of member records, for checking the one-member-per-user rule.
    pub fn member_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.tables()?.members.len())
    }
}

impl AccountRepository for InMemoryStore {
    fn insert_account(&self, user: User, member: Member) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if member.user != user.id {
            return Err(RepositoryError::Unavailable(
                "member must belong to the inserted user".to_string(),
            ));
        }
        let taken = tables.users.contains_key(&user.id)
            || tables.members.contains_key(&user.id)
            || tables
                .users
                .values()
                .any(|existing| existing.username == user.username);
        if taken {
            return Err(RepositoryError::Conflict);
        }
        tables.members.insert(user.id, member);
        tables.users.insert(user.id, user);
        Ok(())
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    fn find_user_by_name(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn fetch_member(&self, user: UserId) -> Result<Option<Member>, RepositoryError> {
        Ok(self.tables()?.members.get(&user).cloned())
    }

    fn update_member(&self, member: Member) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        match tables.members.get_mut(&member.user) {
            Some(slot) => {
                *slot = member;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

impl CatalogRepository for InMemoryStore {
    fn insert_notice(&self, notice: AdoptionNotice) -> Result<AdoptionNotice, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.notices.iter().any(|existing| existing.id == notice.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.notices.push(notice.clone());
        Ok(notice)
    }

    fn insert_notice_with_animals(
        &self,
        notice: AdoptionNotice,
        animals: Vec<Animal>,
    ) -> Result<AdoptionNotice, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.notices.iter().any(|existing| existing.id == notice.id) {
            return Err(RepositoryError::Conflict);
        }
        for (index, animal) in animals.iter().enumerate() {
            if animal.notice != notice.id {
                return Err(RepositoryError::NotFound);
            }
            let duplicate = animals[..index].iter().any(|other| other.id == animal.id)
                || tables.animals.iter().any(|existing| existing.id == animal.id);
            if duplicate {
                return Err(RepositoryError::Conflict);
            }
        }
        tables.notices.push(notice.clone());
        tables.animals.extend(animals);
        Ok(notice)
    }

    fn update_notice(&self, notice: AdoptionNotice) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        let slot = tables
            .notices
            .iter_mut()
            .find(|existing| existing.id == notice.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = notice;
        Ok(())
    }

    fn fetch_notice(&self, id: NoticeId) -> Result<Option<AdoptionNotice>, RepositoryError> {
        Ok(self
            .tables()?
            .notices
            .iter()
            .find(|notice| notice.id == id)
            .cloned())
    }

    fn delete_notice(&self, id: NoticeId) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        let before = tables.notices.len();
        tables.notices.retain(|notice| notice.id != id);
        if tables.notices.len() == before {
            return Err(RepositoryError::NotFound);
        }
        tables.animals.retain(|animal| animal.notice != id);
        tables.comments.retain(|comment| comment.notice != id);
        Ok(())
    }

    fn list_notices(&self) -> Result<Vec<AdoptionNotice>, RepositoryError> {
        Ok(self.tables()?.notices.clone())
    }

    fn insert_animal(&self, animal: Animal) -> Result<Animal, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.notices.iter().any(|notice| notice.id == animal.notice) {
            return Err(RepositoryError::NotFound);
        }
        if tables.animals.iter().any(|existing| existing.id == animal.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.animals.push(animal.clone());
        Ok(animal)
    }

    fn update_animal(&self, animal: Animal) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        let slot = tables
            .animals
            .iter_mut()
            .find(|existing| existing.id == animal.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = animal;
        Ok(())
    }

    fn fetch_animal(&self, id: AnimalId) -> Result<Option<Animal>, RepositoryError> {
        Ok(self
            .tables()?
            .animals
            .iter()
            .find(|animal| animal.id == id)
            .cloned())
    }

    fn animals_for_notice(&self, notice: NoticeId) -> Result<Vec<Animal>, RepositoryError> {
        Ok(self
            .tables()?
            .animals
            .iter()
            .filter(|animal| animal.notice == notice)
            .cloned()
            .collect())
    }

    fn insert_species(&self, species: Species) -> Result<Species, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.species.contains_key(&species.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.species.insert(species.id, species.clone());
        Ok(species)
    }

    fn fetch_species(&self, id: SpeciesId) -> Result<Option<Species>, RepositoryError> {
        Ok(self.tables()?.species.get(&id).cloned())
    }

    fn insert_organization(
        &self,
        organization: RescueOrganization,
    ) -> Result<RescueOrganization, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.organizations.contains_key(&organization.id) {
            return Err(RepositoryError::Conflict);
        }
        tables
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    fn fetch_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<RescueOrganization>, RepositoryError> {
        Ok(self.tables()?.organizations.get(&id).cloned())
    }

    fn insert_comment(&self, comment: Comment) -> Result<Comment, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.notices.iter().any(|notice| notice.id == comment.notice) {
            return Err(RepositoryError::NotFound);
        }
        if tables.comments.iter().any(|existing| existing.id == comment.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    fn fetch_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self
            .tables()?
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned())
    }

    fn comments_for_notice(&self, notice: NoticeId) -> Result<Vec<Comment>, RepositoryError> {
        Ok(self
            .tables()?
            .comments
            .iter()
            .filter(|comment| comment.notice == notice)
            .cloned()
            .collect())
    }
}

impl LocationRepository for InMemoryStore {
    fn insert_location(&self, location: Location) -> Result<Location, RepositoryError> {
        let mut tables = self.tables()?;
        let taken = tables
            .locations
            .iter()
            .any(|existing| existing.id == location.id || existing.query == location.query);
        if taken {
            return Err(RepositoryError::Conflict);
        }
        tables.locations.push(location.clone());
        Ok(location)
    }

    fn fetch_location(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        Ok(self
            .tables()?
            .locations
            .iter()
            .find(|location| location.id == id)
            .cloned())
    }

    fn find_location_by_query(&self, query: &str) -> Result<Option<Location>, RepositoryError> {
        Ok(self
            .tables()?
            .locations
            .iter()
            .find(|location| location.query == query)
            .cloned())
    }
}

impl ModerationRepository for InMemoryStore {
    fn insert_rule(&self, rule: Rule) -> Result<Rule, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.rules.contains_key(&rule.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    fn fetch_rule(&self, id: RuleId) -> Result<Option<Rule>, RepositoryError> {
        Ok(self.tables()?.rules.get(&id).cloned())
    }

    fn list_rules(&self) -> Result<Vec<Rule>, RepositoryError> {
        let mut rules: Vec<Rule> = self.tables()?.rules.values().cloned().collect();
        rules.sort_by_key(|rule| rule.id);
        Ok(rules)
    }

    fn insert_report(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.reports.iter().any(|existing| existing.id == report.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.reports.push(report.clone());
        Ok(report)
    }

    fn fetch_report(&self, id: ReportId) -> Result<Option<Report>, RepositoryError> {
        Ok(self
            .tables()?
            .reports
            .iter()
            .find(|report| report.id == id)
            .cloned())
    }

    fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, RepositoryError> {
        Ok(self
            .tables()?
            .reports
            .iter()
            .filter(|report| status.map_or(true, |status| report.status == status))
            .cloned()
            .collect())
    }

    fn record_action(&self, action: ModerationAction) -> Result<Report, RepositoryError> {
        let mut tables = self.tables()?;
        let report = tables
            .reports
            .iter_mut()
            .find(|report| report.id == action.report)
            .ok_or(RepositoryError::NotFound)?;
        report.status = action.kind.resulting_status();
        let updated = report.clone();
        tables.actions.push(action);
        Ok(updated)
    }

    fn actions_for_report(&self, id: ReportId) -> Result<Vec<ModerationAction>, RepositoryError> {
        Ok(self
            .tables()?
            .actions
            .iter()
            .filter(|action| action.report == id)
            .cloned()
            .collect())
    }
}
