use super::common::*;
use crate::catalog::photos::{resolve_photos, resolve_primary_photo};

#[test]
fn notice_photos_take_precedence_over_animal_photos() {
    let notice = bare_notice(vec![photo(1, "Gruppenbild"), photo(2, "Käfig")]);
    let animals = vec![bare_animal(1, vec![photo(3, "Max")])];

    let titles: Vec<&str> = resolve_photos(&notice, &animals)
        .into_iter()
        .map(|photo| photo.title.as_str())
        .collect();

    assert_eq!(titles, vec!["Gruppenbild", "Käfig"]);
    assert_eq!(
        resolve_primary_photo(&notice, &animals).map(|photo| photo.id),
        Some(notice.photos[0].id)
    );
}

#[test]
fn animal_photos_are_concatenated_in_animal_order() {
    let notice = bare_notice(Vec::new());
    let animals = vec![
        bare_animal(1, vec![photo(1, "Max vorne"), photo(2, "Max hinten")]),
        bare_animal(2, Vec::new()),
        bare_animal(3, vec![photo(3, "Moritz")]),
    ];

    let titles: Vec<&str> = resolve_photos(&notice, &animals)
        .into_iter()
        .map(|photo| photo.title.as_str())
        .collect();

    assert_eq!(titles, vec!["Max vorne", "Max hinten", "Moritz"]);
    assert_eq!(
        resolve_primary_photo(&notice, &animals).map(|photo| photo.title.as_str()),
        Some("Max vorne")
    );
}

#[test]
fn no_photos_anywhere_yields_nothing() {
    let notice = bare_notice(Vec::new());
    let animals = vec![bare_animal(1, Vec::new())];

    assert!(resolve_photos(&notice, &animals).is_empty());
    assert!(resolve_primary_photo(&notice, &animals).is_none());
    assert!(resolve_primary_photo(&notice, &[]).is_none());
}
