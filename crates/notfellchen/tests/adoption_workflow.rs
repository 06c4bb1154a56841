//! End-to-end scenarios through the public services: accounts, catalog and
//! moderation sharing one in-memory store and the offline geocoder.

mod common {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use notfellchen::accounts::AccountService;
    use notfellchen::catalog::{CatalogService, NoticeSubmission};
    use notfellchen::geo::{LocationDirectory, StaticGeocoder};
    use notfellchen::moderation::ModerationWorkflow;
    use notfellchen::store::InMemoryStore;

    pub(super) struct Site {
        pub(super) accounts: AccountService<InMemoryStore>,
        pub(super) catalog: CatalogService<InMemoryStore, InMemoryStore>,
        pub(super) moderation: ModerationWorkflow<InMemoryStore, InMemoryStore>,
    }

    pub(super) fn site() -> Site {
        let store = Arc::new(InMemoryStore::default());
        let directory = Arc::new(LocationDirectory::new(
            store.clone(),
            Arc::new(StaticGeocoder::default()),
        ));
        Site {
            accounts: AccountService::new(store.clone()),
            catalog: CatalogService::new(store.clone(), directory),
            moderation: ModerationWorkflow::new(store.clone(), store),
        }
    }

    pub(super) fn notice(name: &str, place: &str) -> NoticeSubmission {
        NoticeSubmission {
            name: name.to_string(),
            description: Some("Verschmust und stubenrein".to_string()),
            searching_since: NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
            group_only: true,
            further_information: Some("https://notfellchen.org/info".to_string()),
            organization: None,
            location_string: Some(place.to_string()),
        }
    }
}

use common::*;
use notfellchen::accounts::{Member, RegisterAccount, TrustLevel, UserId};
use notfellchen::catalog::{NoticeStatus, SearchQuery};
use notfellchen::moderation::{ActionKind, ReportStatus, ReportTarget};

fn register(site: &Site, username: &str) -> Member {
    let (_, member) = site
        .accounts
        .register(RegisterAccount {
            username: username.to_string(),
            email: format!("{username}@example.org"),
        })
        .expect("registration succeeds");
    member
}

#[test]
fn member_notice_is_published_after_moderation() {
    let site = site();
    let admin = Member {
        user: UserId(0),
        trust_level: TrustLevel::Admin,
    };
    let owner = register(&site, "hannah");
    let moderator = site
        .accounts
        .set_trust_level(
            &admin,
            register(&site, "mod_jonas").user,
            TrustLevel::Moderator,
        )
        .expect("admin promotes");

    let notice = site
        .catalog
        .create_notice(&owner, notice("Kater Moritz", "72072"))
        .expect("notice created");
    assert_eq!(notice.status, NoticeStatus::AwaitingModeration);
    assert!(site
        .catalog
        .search(SearchQuery::default())
        .expect("search")
        .is_empty());

    site.catalog
        .activate_notice(&moderator, notice.id)
        .expect("moderator publishes");

    let hits = site
        .catalog
        .search(SearchQuery {
            place: Some("Tübingen".to_string()),
            max_distance_km: Some(5.0),
        })
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].notice.id, notice.id);
    assert!(hits[0].distance_km.expect("distance") < 1e-6);
}

#[test]
fn reported_comment_is_resolved_by_a_moderator() {
    let site = site();
    let coordinator = Member {
        user: UserId(0),
        trust_level: TrustLevel::Coordinator,
    };
    let moderator = Member {
        user: UserId(0),
        trust_level: TrustLevel::Moderator,
    };
    let reader = register(&site, "leser");

    let notice = site
        .catalog
        .create_notice(&coordinator, notice("Hündin Luna", "72072"))
        .expect("notice created");
    let comment = site
        .catalog
        .add_comment(notice.id, reader.user, "Billige Uhren hier!")
        .expect("comment");
    let rule = site
        .moderation
        .add_rule("Kein Spam", "Werbung wird entfernt.")
        .expect("rule");

    let report = site
        .moderation
        .file_report(ReportTarget::Comment(comment.id), &[rule.id], "Spam")
        .expect("report filed");
    assert_eq!(
        site.moderation
            .open_reports(&moderator)
            .expect("queue")
            .len(),
        1
    );

    site.moderation
        .apply_action_as(
            &moderator,
            report.id,
            ActionKind::ContentDeleted,
            "Kommentar gelöscht",
            "",
        )
        .expect("action applied");

    let resolved = site
        .moderation
        .report_with_actions(report.id)
        .expect("report");
    assert_eq!(resolved.report.status, ReportStatus::ActionTaken);
    assert_eq!(resolved.actions.len(), 1);
    assert!(site
        .moderation
        .open_reports(&moderator)
        .expect("queue")
        .is_empty());
}

#[test]
fn report_targets_serialize_with_their_kind() {
    let target = ReportTarget::Notice(notfellchen::catalog::NoticeId(12));

    let json = serde_json::to_value(target).expect("serializes");

    assert_eq!(json, serde_json::json!({ "kind": "notice", "id": 12 }));
}
