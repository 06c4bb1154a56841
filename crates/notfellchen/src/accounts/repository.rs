use super::domain::{Member, User, UserId};
use crate::repository::RepositoryError;

/// Storage for users and their member records.
pub trait AccountRepository: Send + Sync {
    /// Stores the user together with its member record. Both are written or
    /// neither is.
    fn insert_account(&self, user: User, member: Member) -> Result<(), RepositoryError>;
    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_user_by_name(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn fetch_member(&self, user: UserId) -> Result<Option<Member>, RepositoryError>;
    fn update_member(&self, member: Member) -> Result<(), RepositoryError>;
}
