use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{CommentId, NoticeId};

/// Opaque report token, safe to hand out in links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub Uuid);

impl ReportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(pub u64);

/// A site rule reports can cite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub title: String,
    pub rule_text: String,
}

/// What a report is about. Exactly one target per report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ReportTarget {
    Notice(NoticeId),
    Comment(CommentId),
}

impl fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportTarget::Notice(id) => write!(f, "adoption notice {id}"),
            ReportTarget::Comment(id) => write!(f, "comment {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Waiting,
    ActionTaken,
    NoActionTaken,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Waiting => "waiting",
            ReportStatus::ActionTaken => "action_taken",
            ReportStatus::NoActionTaken => "no_action_taken",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    UserBanned,
    ContentDeleted,
    CommentAdded,
    OtherActionTaken,
    NoActionTaken,
}

impl ActionKind {
    pub const fn label(self) -> &'static str {
        match self {
            ActionKind::UserBanned => "user_banned",
            ActionKind::ContentDeleted => "content_deleted",
            ActionKind::CommentAdded => "comment_added",
            ActionKind::OtherActionTaken => "other_action_taken",
            ActionKind::NoActionTaken => "no_action_taken",
        }
    }

    /// Status a report ends up in once this action is applied. Never waiting.
    pub const fn resulting_status(self) -> ReportStatus {
        match self {
            ActionKind::NoActionTaken => ReportStatus::NoActionTaken,
            _ => ReportStatus::ActionTaken,
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "user_banned" => Ok(ActionKind::UserBanned),
            "content_deleted" => Ok(ActionKind::ContentDeleted),
            "comment_added" => Ok(ActionKind::CommentAdded),
            "other_action_taken" => Ok(ActionKind::OtherActionTaken),
            "no_action_taken" => Ok(ActionKind::NoActionTaken),
            other => Err(format!("unknown moderation action '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub target: ReportTarget,
    pub status: ReportStatus,
    pub violated_rules: BTreeSet<RuleId>,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// One entry of a report's append-only action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationAction {
    pub id: ActionId,
    pub report: ReportId,
    pub kind: ActionKind,
    pub public_comment: String,
    /// Visible to moderators only.
    pub private_comment: String,
    pub created_at: DateTime<Utc>,
}

/// Action as shown to the person who filed the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicModerationAction {
    pub kind: ActionKind,
    pub public_comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ModerationAction> for PublicModerationAction {
    fn from(action: &ModerationAction) -> Self {
        Self {
            kind: action.kind,
            public_comment: action.public_comment.clone(),
            created_at: action.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportWithActions {
    pub report: Report,
    /// Filing order.
    pub actions: Vec<ModerationAction>,
}

impl ReportWithActions {
    pub fn public_actions(&self) -> Vec<PublicModerationAction> {
        self.actions.iter().map(PublicModerationAction::from).collect()
    }
}

/// Report form input. Exactly one of `adoption_notice` and
/// `reported_comment` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    #[serde(default)]
    pub adoption_notice: Option<NoticeId>,
    #[serde(default)]
    pub reported_comment: Option<CommentId>,
    #[serde(default)]
    pub violated_rules: Vec<RuleId>,
    #[serde(default)]
    pub comment: String,
}

impl ReportSubmission {
    pub fn target(&self) -> Option<ReportTarget> {
        match (self.adoption_notice, self.reported_comment) {
            (Some(notice), None) => Some(ReportTarget::Notice(notice)),
            (None, Some(comment)) => Some(ReportTarget::Comment(comment)),
            _ => None,
        }
    }
}
