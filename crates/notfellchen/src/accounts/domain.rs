use serde::{Deserialize, Serialize};

/// Identifier wrapper for user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Input for the account-creation workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAccount {
    pub username: String,
    pub email: String,
}

/// Coarse permission tier. Declared from most to least privileged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Admin,
    Moderator,
    Coordinator,
    #[default]
    Member,
}

impl TrustLevel {
    pub const fn label(self) -> &'static str {
        match self {
            TrustLevel::Admin => "admin",
            TrustLevel::Moderator => "moderator",
            TrustLevel::Coordinator => "coordinator",
            TrustLevel::Member => "member",
        }
    }
}

/// Site-specific profile attached to every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: UserId,
    pub trust_level: TrustLevel,
}
