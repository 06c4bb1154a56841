use super::common::*;
use crate::accounts::{AuthorizationError, Capability, TrustLevel, UserId};
use crate::catalog::domain::{NoticeStatus, Sex};
use crate::catalog::forms::{AnimalSubmission, NewPhoto, NoticeWithAnimalsSubmission};
use crate::catalog::repository::CatalogRepository;
use crate::catalog::{CatalogError, FormError, OrganizationSubmission, SearchQuery};
use crate::geo::{GeoError, LocateError, StaticGeocoder};
use chrono::NaiveDate;

fn new_photo(title: &str) -> NewPhoto {
    NewPhoto {
        title: title.to_string(),
        alt_text: format!("Foto: {title}"),
        storage_key: format!("uploads/{title}.jpg"),
    }
}

#[test]
fn member_notices_wait_for_moderation() {
    let (service, _) = service_with(swabia());

    let notice = service
        .create_notice(&member(TrustLevel::Member), submission("Max und Moritz", None))
        .expect("notice created");

    assert_eq!(notice.status, NoticeStatus::AwaitingModeration);
    assert_eq!(notice.owner, UserId(7));
}

#[test]
fn coordinator_notices_are_published_immediately() {
    let (service, _) = service_with(swabia());

    let notice = service
        .create_notice(
            &member(TrustLevel::Coordinator),
            submission("Max und Moritz", None),
        )
        .expect("notice created");

    assert_eq!(notice.status, NoticeStatus::Active);
}

#[test]
fn unresolvable_place_still_creates_the_notice() {
    let (service, _) = service_with(StaticGeocoder::with_payload("[]"));

    let notice = service
        .create_notice(
            &member(TrustLevel::Coordinator),
            submission("Flocke", Some("Atlantis")),
        )
        .expect("lookup failure is not fatal");

    assert!(notice.location.is_none());
    let detail = service.notice_detail(notice.id).expect("detail");
    assert!(detail.location.is_none());
}

#[test]
fn resolvable_place_is_attached_and_cached() {
    let (service, _) = service_with(StaticGeocoder::default());
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");

    let first = service
        .create_notice_on(
            &member(TrustLevel::Coordinator),
            submission("Flocke", Some("72072")),
            today,
        )
        .expect("created");
    let second = service
        .create_notice_on(
            &member(TrustLevel::Coordinator),
            submission("Schnee", Some(" 72072 ")),
            today,
        )
        .expect("created");

    assert_eq!(first.created_at, today);
    assert!(first.location.is_some());
    assert_eq!(first.location, second.location);
    let detail = service.notice_detail(first.id).expect("detail");
    let location = detail.location.expect("location resolved");
    assert_eq!(location.place_id, 138181499);
    assert!(location.display_name.contains("Tübingen"));
}

#[test]
fn notice_with_animals_names_them_after_the_species() {
    let (service, _) = service_with(swabia());
    let species = service.register_species("Ratte").expect("species");

    let detail = service
        .create_notice_with_animals(
            &member(TrustLevel::Coordinator),
            NoticeWithAnimalsSubmission {
                notice: submission("Rattenrudel", None),
                species: species.id,
                sex: Sex::FemaleNeutered,
                date_of_birth: None,
                num_animals: 3,
            },
        )
        .expect("created");

    let names: Vec<&str> = detail
        .animals
        .iter()
        .map(|animal| animal.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ratte 1", "Ratte 2", "Ratte 3"]);
    assert!(detail
        .animals
        .iter()
        .all(|animal| animal.notice == detail.notice.id && animal.sex == Sex::FemaleNeutered));
}

#[test]
fn notice_with_animals_rejects_bad_counts_and_species() {
    let (service, store) = service_with(swabia());
    let species = service.register_species("Ratte").expect("species");
    let mut form = NoticeWithAnimalsSubmission {
        notice: submission("Rattenrudel", None),
        species: species.id,
        sex: Sex::Male,
        date_of_birth: None,
        num_animals: 0,
    };

    assert!(matches!(
        service.create_notice_with_animals(&member(TrustLevel::Member), form.clone()),
        Err(CatalogError::Form(FormError::AnimalCount(0)))
    ));

    form.num_animals = 2;
    form.species = crate::catalog::SpeciesId(999_999);
    assert!(matches!(
        service.create_notice_with_animals(&member(TrustLevel::Member), form),
        Err(CatalogError::UnknownSpecies(_))
    ));
    assert!(store.list_notices().expect("list").is_empty());
}

#[test]
fn deleting_a_notice_removes_animals_and_comments() {
    let (service, store) = service_with(swabia());
    let species = service.register_species("Kaninchen").expect("species");
    let notice = service
        .create_notice(&member(TrustLevel::Coordinator), submission("Hoppel", None))
        .expect("notice");
    let animal = service
        .add_animal(
            notice.id,
            AnimalSubmission {
                name: "Hoppel".to_string(),
                species: species.id,
                sex: Sex::Female,
                date_of_birth: None,
                description: None,
            },
        )
        .expect("animal");
    let comment = service
        .add_comment(notice.id, UserId(8), "Ist sie noch da?")
        .expect("comment");

    service.delete_notice(notice.id).expect("deleted");

    assert!(store.fetch_animal(animal.id).expect("fetch").is_none());
    assert!(store.fetch_comment(comment.id).expect("fetch").is_none());
    assert!(matches!(
        service.delete_notice(notice.id),
        Err(CatalogError::NoticeNotFound(id)) if id == notice.id
    ));
}

#[test]
fn comments_are_limited_in_length() {
    let (service, _) = service_with(swabia());
    let notice = service
        .create_notice(&member(TrustLevel::Member), submission("Hoppel", None))
        .expect("notice");

    let result = service.add_comment(notice.id, UserId(8), &"a".repeat(2001));

    assert!(matches!(
        result,
        Err(CatalogError::Form(FormError::TooLong { field: "text", .. }))
    ));
}

#[test]
fn primary_photo_falls_back_to_animal_photos() {
    let (service, _) = service_with(swabia());
    let species = service.register_species("Meerschweinchen").expect("species");
    let detail = service
        .create_notice_with_animals(
            &member(TrustLevel::Coordinator),
            NoticeWithAnimalsSubmission {
                notice: submission("Quieker", None),
                species: species.id,
                sex: Sex::Male,
                date_of_birth: None,
                num_animals: 2,
            },
        )
        .expect("created");

    service
        .attach_animal_photo(detail.animals[1].id, UserId(7), new_photo("zweites"))
        .expect("animal photo");
    let detail = service.notice_detail(detail.notice.id).expect("detail");
    assert_eq!(
        detail.primary_photo().map(|photo| photo.title.as_str()),
        Some("zweites")
    );

    service
        .attach_notice_photo(detail.notice.id, UserId(7), new_photo("gruppe"))
        .expect("notice photo");
    let detail = service.notice_detail(detail.notice.id).expect("detail");
    assert_eq!(
        detail.primary_photo().map(|photo| photo.title.as_str()),
        Some("gruppe")
    );
    assert_eq!(detail.photos().len(), 1);
}

#[test]
fn activation_requires_moderation_rights() {
    let (service, _) = service_with(swabia());
    let notice = service
        .create_notice(&member(TrustLevel::Member), submission("Hoppel", None))
        .expect("notice");

    match service.activate_notice(&member(TrustLevel::Coordinator), notice.id) {
        Err(CatalogError::Unauthorized(AuthorizationError { capability, .. })) => {
            assert_eq!(capability, Capability::AddModerationAction)
        }
        other => panic!("expected authorization failure, got {other:?}"),
    }

    let activated = service
        .activate_notice(&member(TrustLevel::Moderator), notice.id)
        .expect("moderator may activate");
    assert_eq!(activated.status, NoticeStatus::Active);
    assert_eq!(
        service.notice(notice.id).expect("stored").status,
        NoticeStatus::Active
    );
}

#[test]
fn search_orders_by_distance_and_applies_radius() {
    let (service, _) = service_with(swabia());
    let coordinator = member(TrustLevel::Coordinator);
    let berlin = service
        .create_notice(&coordinator, submission("Spree", Some("Berlin")))
        .expect("notice");
    let unlocated = service
        .create_notice(&coordinator, submission("Irgendwo", None))
        .expect("notice");
    let stuttgart = service
        .create_notice(&coordinator, submission("Neckar", Some("Stuttgart")))
        .expect("notice");
    let tuebingen = service
        .create_notice(&coordinator, submission("Stocherkahn", Some("Tübingen")))
        .expect("notice");
    service
        .create_notice(&member(TrustLevel::Member), submission("Versteckt", Some("Tübingen")))
        .expect("pending notice");

    let all = service
        .search(SearchQuery {
            place: Some("Tübingen".to_string()),
            max_distance_km: None,
        })
        .expect("search");
    let order: Vec<_> = all.iter().map(|hit| hit.notice.id).collect();
    assert_eq!(order, vec![tuebingen.id, stuttgart.id, berlin.id, unlocated.id]);
    assert!(all[0].distance_km.expect("distance") < 1e-6);
    let to_stuttgart = all[1].distance_km.expect("distance");
    assert!((20.0..40.0).contains(&to_stuttgart), "{to_stuttgart}");
    assert!(all[3].distance_km.is_none());

    let nearby = service
        .search(SearchQuery {
            place: Some("Tübingen".to_string()),
            max_distance_km: Some(50.0),
        })
        .expect("search");
    let order: Vec<_> = nearby.iter().map(|hit| hit.notice.id).collect();
    assert_eq!(order, vec![tuebingen.id, stuttgart.id]);
}

#[test]
fn search_without_place_lists_active_notices_in_creation_order() {
    let (service, _) = service_with(swabia());
    let coordinator = member(TrustLevel::Coordinator);
    let first = service
        .create_notice(&coordinator, submission("Erste", Some("Berlin")))
        .expect("notice");
    let second = service
        .create_notice(&coordinator, submission("Zweite", None))
        .expect("notice");

    let hits = service
        .search(SearchQuery {
            place: None,
            max_distance_km: Some(1.0),
        })
        .expect("search");

    let order: Vec<_> = hits.iter().map(|hit| hit.notice.id).collect();
    assert_eq!(order, vec![first.id, second.id]);
    assert!(hits.iter().all(|hit| hit.distance_km.is_none()));
}

#[test]
fn search_from_unknown_place_reports_the_lookup_failure() {
    let (service, _) = service_with(swabia());

    let result = service.search(SearchQuery {
        place: Some("Atlantis".to_string()),
        max_distance_km: None,
    });

    assert!(matches!(
        result,
        Err(CatalogError::Location(LocateError::Geo(
            GeoError::LookupFailure { .. }
        )))
    ));
}

#[test]
fn organizations_need_a_resolvable_location() {
    let (service, _) = service_with(swabia());
    let submission = OrganizationSubmission {
        name: "Rattenhilfe Süd".to_string(),
        trusted: true,
        location_string: "Atlantis".to_string(),
        instagram: None,
        facebook: None,
        fediverse_profile: Some("https://social.example/@rattenhilfe".to_string()),
        website: Some(" ".to_string()),
    };

    assert!(matches!(
        service.register_organization(submission.clone()),
        Err(CatalogError::Location(_))
    ));

    let organization = service
        .register_organization(OrganizationSubmission {
            location_string: "Stuttgart".to_string(),
            ..submission
        })
        .expect("registered");
    assert!(organization.website.is_none());

    let mut notice = super::common::submission("Vermittlung", None);
    notice.organization = Some(organization.id);
    let created = service
        .create_notice(&member(TrustLevel::Coordinator), notice.clone())
        .expect("notice with organization");
    assert_eq!(created.organization, Some(organization.id));

    notice.organization = Some(crate::catalog::OrganizationId(999_999));
    assert!(matches!(
        service.create_notice(&member(TrustLevel::Coordinator), notice),
        Err(CatalogError::UnknownOrganization(_))
    ));
}
