use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{Member, RegisterAccount, TrustLevel, User, UserId};
use super::permissions::{authorize, AuthorizationError, Capability};
use super::repository::AccountRepository;
use crate::repository::RepositoryError;

const MAX_USERNAME_LEN: usize = 150;

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_user_id() -> UserId {
    UserId(USER_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Account-creation workflow. Every registered user receives exactly one
/// member record in the same repository write.
pub struct AccountService<R> {
    repository: Arc<R>,
}

impl<R> AccountService<R>
where
    R: AccountRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn register(&self, request: RegisterAccount) -> Result<(User, Member), AccountError> {
        let username = request.username.trim();
        if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
            return Err(AccountError::InvalidUsername);
        }
        let email = request.email.trim();
        if !email.contains('@') {
            return Err(AccountError::InvalidEmail);
        }
        if self.repository.find_user_by_name(username)?.is_some() {
            return Err(AccountError::Repository(RepositoryError::Conflict));
        }

        let user = User {
            id: next_user_id(),
            username: username.to_string(),
            email: email.to_string(),
        };
        let member = Member {
            user: user.id,
            trust_level: TrustLevel::default(),
        };

        self.repository
            .insert_account(user.clone(), member.clone())?;
        info!(user = user.id.0, username = %user.username, "account registered");
        Ok((user, member))
    }

    /// Member record for a user. A user without one violates the
    /// registration invariant and is reported as not found.
    pub fn member(&self, user: UserId) -> Result<Member, AccountError> {
        self.repository
            .fetch_member(user)?
            .ok_or(AccountError::Repository(RepositoryError::NotFound))
    }

    pub fn set_trust_level(
        &self,
        actor: &Member,
        user: UserId,
        trust_level: TrustLevel,
    ) -> Result<Member, AccountError> {
        authorize(actor, Capability::ChangeUser)?;
        let mut member = self.member(user)?;
        member.trust_level = trust_level;
        self.repository.update_member(member.clone())?;
        info!(
            actor = actor.user.0,
            user = user.0,
            trust_level = trust_level.label(),
            "trust level changed"
        );
        Ok(member)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("username must be between 1 and 150 characters")]
    InvalidUsername,
    #[error("email address is not valid")]
    InvalidEmail,
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
