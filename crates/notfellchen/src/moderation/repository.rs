use super::domain::{ModerationAction, Report, ReportId, ReportStatus, Rule, RuleId};
use crate::repository::RepositoryError;

/// Storage for rules, reports and their action logs. Actions are only ever
/// appended.
pub trait ModerationRepository: Send + Sync {
    fn insert_rule(&self, rule: Rule) -> Result<Rule, RepositoryError>;
    fn fetch_rule(&self, id: RuleId) -> Result<Option<Rule>, RepositoryError>;
    fn list_rules(&self) -> Result<Vec<Rule>, RepositoryError>;

    fn insert_report(&self, report: Report) -> Result<Report, RepositoryError>;
    fn fetch_report(&self, id: ReportId) -> Result<Option<Report>, RepositoryError>;
    /// Reports in filing order, optionally restricted to one status.
    fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<Report>, RepositoryError>;

    /// Appends the action and moves its report to the action's resulting
    /// status in one write. Returns the updated report, or `NotFound` when
    /// the report does not exist.
    fn record_action(&self, action: ModerationAction) -> Result<Report, RepositoryError>;
    /// Actions of a report in the order they were appended.
    fn actions_for_report(&self, id: ReportId) -> Result<Vec<ModerationAction>, RepositoryError>;
}
