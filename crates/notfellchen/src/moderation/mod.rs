//! Reports against notices or comments and the moderation actions that
//! resolve them.

pub mod domain;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ActionId, ActionKind, ModerationAction, PublicModerationAction, Report, ReportId,
    ReportStatus, ReportSubmission, ReportTarget, ReportWithActions, Rule, RuleId,
};
pub use repository::ModerationRepository;
pub use service::{ModerationError, ModerationWorkflow};
