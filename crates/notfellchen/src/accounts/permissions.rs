use serde::Serialize;

use super::domain::{Member, TrustLevel};

/// Bumped whenever the capability table below changes.
pub const PERMISSION_TABLE_VERSION: u32 = 1;

/// Actions gated by trust level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreateActiveAdoptionNotice,
    ViewReport,
    AddModerationAction,
    ChangeUser,
}

const MEMBER_CAPABILITIES: &[Capability] = &[];
const COORDINATOR_CAPABILITIES: &[Capability] = &[Capability::CreateActiveAdoptionNotice];
const MODERATOR_CAPABILITIES: &[Capability] = &[
    Capability::CreateActiveAdoptionNotice,
    Capability::ViewReport,
    Capability::AddModerationAction,
    Capability::ChangeUser,
];
const ADMIN_CAPABILITIES: &[Capability] = MODERATOR_CAPABILITIES;

impl TrustLevel {
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            TrustLevel::Admin => ADMIN_CAPABILITIES,
            TrustLevel::Moderator => MODERATOR_CAPABILITIES,
            TrustLevel::Coordinator => COORDINATOR_CAPABILITIES,
            TrustLevel::Member => MEMBER_CAPABILITIES,
        }
    }

    pub fn allows(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("trust level '{}' lacks capability {capability:?}", .trust_level.label())]
pub struct AuthorizationError {
    pub trust_level: TrustLevel,
    pub capability: Capability,
}

pub fn authorize(member: &Member, capability: Capability) -> Result<(), AuthorizationError> {
    if member.trust_level.allows(capability) {
        Ok(())
    } else {
        Err(AuthorizationError {
            trust_level: member.trust_level,
            capability,
        })
    }
}
