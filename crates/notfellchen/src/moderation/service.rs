use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    ActionId, ActionKind, ModerationAction, Report, ReportId, ReportStatus, ReportSubmission,
    ReportTarget, ReportWithActions, Rule, RuleId,
};
use super::repository::ModerationRepository;
use crate::accounts::{authorize, AuthorizationError, Capability, Member};
use crate::catalog::CatalogRepository;
use crate::repository::RepositoryError;

const MAX_REPORT_COMMENT_LEN: usize = 2000;

static RULE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ACTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Files reports against notices or comments and records moderator
/// decisions on them.
pub struct ModerationWorkflow<M, C> {
    repository: Arc<M>,
    catalog: Arc<C>,
}

impl<M, C> ModerationWorkflow<M, C>
where
    M: ModerationRepository + 'static,
    C: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<M>, catalog: Arc<C>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub fn add_rule(&self, title: &str, rule_text: &str) -> Result<Rule, ModerationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ModerationError::InvalidRule);
        }
        let rule = Rule {
            id: RuleId(RULE_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            title: title.to_string(),
            rule_text: rule_text.trim().to_string(),
        };
        Ok(self.repository.insert_rule(rule)?)
    }

    pub fn rules(&self) -> Result<Vec<Rule>, ModerationError> {
        Ok(self.repository.list_rules()?)
    }

    /// Form entry point: resolves the target, then files the report.
    pub fn submit(&self, submission: ReportSubmission) -> Result<Report, ModerationError> {
        let target = submission.target().ok_or(ModerationError::InvalidTarget)?;
        self.file_report(target, &submission.violated_rules, &submission.comment)
    }

    /// File a new report in waiting status.
    pub fn file_report(
        &self,
        target: ReportTarget,
        violated_rules: &[RuleId],
        comment: &str,
    ) -> Result<Report, ModerationError> {
        let exists = match target {
            ReportTarget::Notice(id) => self.catalog.fetch_notice(id)?.is_some(),
            ReportTarget::Comment(id) => self.catalog.fetch_comment(id)?.is_some(),
        };
        if !exists {
            return Err(ModerationError::NotFound(target));
        }

        let violated_rules: BTreeSet<RuleId> = violated_rules.iter().copied().collect();
        for rule in &violated_rules {
            if self.repository.fetch_rule(*rule)?.is_none() {
                return Err(ModerationError::UnknownRule(*rule));
            }
        }

        let comment = comment.trim();
        if comment.chars().count() > MAX_REPORT_COMMENT_LEN {
            return Err(ModerationError::CommentTooLong);
        }

        let report = Report {
            id: ReportId::new(),
            target,
            status: ReportStatus::Waiting,
            violated_rules,
            comment: comment.to_string(),
            created_at: Utc::now(),
        };
        let stored = self.repository.insert_report(report)?;
        info!(report = %stored.id, %target, rules = stored.violated_rules.len(), "report filed");
        Ok(stored)
    }

    /// Append a moderation action. The report's status follows the most
    /// recent action.
    pub fn apply_action(
        &self,
        report: ReportId,
        kind: ActionKind,
        public_comment: &str,
        private_comment: &str,
    ) -> Result<ModerationAction, ModerationError> {
        let action = ModerationAction {
            id: ActionId(ACTION_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            report,
            kind,
            public_comment: public_comment.trim().to_string(),
            private_comment: private_comment.trim().to_string(),
            created_at: Utc::now(),
        };
        let updated = match self.repository.record_action(action.clone()) {
            Ok(updated) => updated,
            Err(RepositoryError::NotFound) => return Err(ModerationError::ReportNotFound(report)),
            Err(other) => return Err(other.into()),
        };

        info!(
            report = %report,
            action = kind.label(),
            status = updated.status.label(),
            "moderation action applied"
        );
        Ok(action)
    }

    /// [`Self::apply_action`] on behalf of a member, who must be allowed to
    /// moderate.
    pub fn apply_action_as(
        &self,
        moderator: &Member,
        report: ReportId,
        kind: ActionKind,
        public_comment: &str,
        private_comment: &str,
    ) -> Result<ModerationAction, ModerationError> {
        authorize(moderator, Capability::AddModerationAction)?;
        self.apply_action(report, kind, public_comment, private_comment)
    }

    pub fn report(&self, id: ReportId) -> Result<Report, ModerationError> {
        self.repository
            .fetch_report(id)?
            .ok_or(ModerationError::ReportNotFound(id))
    }

    pub fn report_with_actions(&self, id: ReportId) -> Result<ReportWithActions, ModerationError> {
        let report = self.report(id)?;
        let actions = self.repository.actions_for_report(id)?;
        Ok(ReportWithActions { report, actions })
    }

    /// Reports still waiting for a decision, oldest first.
    pub fn open_reports(&self, viewer: &Member) -> Result<Vec<Report>, ModerationError> {
        authorize(viewer, Capability::ViewReport)?;
        Ok(self.repository.list_reports(Some(ReportStatus::Waiting))?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("a report needs exactly one target: an adoption notice or a comment")]
    InvalidTarget,
    #[error("{0} does not exist")]
    NotFound(ReportTarget),
    #[error("rule {0} does not exist")]
    UnknownRule(RuleId),
    #[error("report {0} not found")]
    ReportNotFound(ReportId),
    #[error("rule title is required")]
    InvalidRule,
    #[error("report comment must be at most 2000 characters")]
    CommentTooLong,
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
