use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::accounts::{Member, TrustLevel, UserId};
use crate::catalog::domain::{AdoptionNotice, Comment, CommentId, NoticeId, NoticeStatus};
use crate::catalog::repository::CatalogRepository;
use crate::moderation::ModerationWorkflow;
use crate::store::InMemoryStore;

pub(super) type Workflow = ModerationWorkflow<InMemoryStore, InMemoryStore>;

pub(super) struct Fixture {
    pub(super) workflow: Workflow,
    pub(super) store: Arc<InMemoryStore>,
    pub(super) notice: NoticeId,
    pub(super) comment: CommentId,
}

/// A workflow over a store that already holds one notice with one comment.
pub(super) fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::default());
    let notice = store
        .insert_notice(AdoptionNotice {
            id: NoticeId(41),
            owner: UserId(1),
            name: "Pfoten suchen Zuhause".to_string(),
            description: None,
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            searching_since: NaiveDate::from_ymd_opt(2024, 4, 20).expect("valid date"),
            organization: None,
            further_information: None,
            group_only: false,
            photos: Vec::new(),
            location: None,
            status: NoticeStatus::Active,
        })
        .expect("notice stored");
    let comment = store
        .insert_comment(Comment {
            id: CommentId(5),
            notice: notice.id,
            author: UserId(2),
            text: "Spam spam spam".to_string(),
            created_at: Utc::now(),
        })
        .expect("comment stored");

    Fixture {
        workflow: ModerationWorkflow::new(store.clone(), store.clone()),
        store,
        notice: notice.id,
        comment: comment.id,
    }
}

pub(super) fn member(trust_level: TrustLevel) -> Member {
    Member {
        user: UserId(3),
        trust_level,
    }
}
