use chrono::Local;
use clap::Args;
use notfellchen::accounts::{
    AccountService, Member, RegisterAccount, TrustLevel, UserId, PERMISSION_TABLE_VERSION,
};
use notfellchen::catalog::{
    CatalogService, NewPhoto, NoticeSubmission, NoticeWithAnimalsSubmission, SearchQuery, Sex,
};
use notfellchen::error::AppError;
use notfellchen::geo::{LocationDirectory, StaticGeocoder};
use notfellchen::moderation::{ActionKind, ModerationWorkflow, ReportTarget};
use notfellchen::store::InMemoryStore;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Place the demo notice is listed at and searched from
    #[arg(long, default_value = "72072")]
    pub(crate) place: String,
    /// Number of animals on the demo notice
    #[arg(long, default_value_t = 2)]
    pub(crate) animals: u8,
}

/// Walks through registration, notice creation, search and moderation
/// against an in-memory store. Always uses the offline geocoder.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { place, animals } = args;

    let store = Arc::new(InMemoryStore::default());
    let directory = Arc::new(LocationDirectory::new(
        store.clone(),
        Arc::new(StaticGeocoder::default()),
    ));
    let accounts = AccountService::new(store.clone());
    let catalog = CatalogService::new(store.clone(), directory);
    let moderation = ModerationWorkflow::new(store.clone(), store.clone());

    println!("Notfellchen demo (permission table v{PERMISSION_TABLE_VERSION})");

    let bootstrap = Member {
        user: UserId(0),
        trust_level: TrustLevel::Admin,
    };
    let (owner_user, owner) = accounts.register(RegisterAccount {
        username: "hannah".to_string(),
        email: "hannah@example.org".to_string(),
    })?;
    let (moderator_user, _) = accounts.register(RegisterAccount {
        username: "jonas".to_string(),
        email: "jonas@example.org".to_string(),
    })?;
    let moderator = accounts.set_trust_level(&bootstrap, moderator_user.id, TrustLevel::Moderator)?;
    println!(
        "  registered {} ({}) and {} ({})",
        owner_user.username,
        owner.trust_level.label(),
        moderator_user.username,
        moderator.trust_level.label()
    );

    let species = catalog.register_species("Ratte")?;
    let detail = catalog.create_notice_with_animals(
        &owner,
        NoticeWithAnimalsSubmission {
            notice: NoticeSubmission {
                name: "Rattenbande sucht Zuhause".to_string(),
                description: Some("Verspielt und neugierig".to_string()),
                searching_since: Local::now().date_naive(),
                group_only: true,
                further_information: None,
                organization: None,
                location_string: Some(place.clone()),
            },
            species: species.id,
            sex: Sex::FemaleNeutered,
            date_of_birth: None,
            num_animals: animals,
        },
    )?;
    let notice = detail.notice.id;
    println!(
        "\nNotice #{notice} '{}' is {}",
        detail.notice.name,
        detail.notice.status.label()
    );
    for animal in &detail.animals {
        println!("  - {} ({})", animal.name, animal.sex.label());
    }
    match &detail.location {
        Some(location) => println!("  located at {}", location.display_name),
        None => println!("  no location could be resolved"),
    }

    if let Some(animal) = detail.animals.last() {
        catalog.attach_animal_photo(
            animal.id,
            owner.user,
            NewPhoto {
                title: format!("{} im Auslauf", animal.name),
                alt_text: "Eine Ratte schnuppert an der Kamera".to_string(),
                storage_key: format!("demo/{}.jpg", animal.id),
            },
        )?;
    }
    let detail = catalog.notice_detail(notice)?;
    match detail.primary_photo() {
        Some(photo) => println!("  primary photo: {}", photo.title),
        None => println!("  no photos yet"),
    }

    let before = catalog.search(SearchQuery::default())?.len();
    catalog.activate_notice(&moderator, notice)?;
    let hits = catalog.search(SearchQuery {
        place: Some(place.clone()),
        max_distance_km: Some(25.0),
    })?;
    println!("\nSearch within 25 km of '{place}' ({before} active before moderation)");
    for hit in &hits {
        match hit.distance_km {
            Some(distance) => println!("  #{} {} ({distance:.1} km)", hit.notice.id, hit.notice.name),
            None => println!("  #{} {}", hit.notice.id, hit.notice.name),
        }
    }

    let comment = catalog.add_comment(notice, owner.user, "Jetzt mit Sonderangebot!")?;
    let rule = moderation.add_rule("Keine Werbung", "Kommerzielle Angebote sind nicht erlaubt.")?;
    let report = moderation.file_report(ReportTarget::Comment(comment.id), &[rule.id], "Werbung")?;
    println!("\nReport {} filed against {}", report.id, report.target);

    moderation.apply_action_as(
        &moderator,
        report.id,
        ActionKind::ContentDeleted,
        "Kommentar entfernt",
        "Erster Verstoß",
    )?;
    let resolved = moderation.report_with_actions(report.id)?;
    println!("  status: {}", resolved.report.status.label());
    for action in resolved.public_actions() {
        println!("  - {}: {}", action.kind.label(), action.public_comment);
    }

    Ok(())
}
