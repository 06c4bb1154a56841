use super::domain::{AdoptionNotice, Animal, Photo};

/// Photos representing a notice. Photos attached to the notice win; without
/// any, the animals' photos are concatenated in animal order. Empty when no
/// photo exists anywhere.
pub fn resolve_photos<'a>(notice: &'a AdoptionNotice, animals: &'a [Animal]) -> Vec<&'a Photo> {
    if !notice.photos.is_empty() {
        return notice.photos.iter().collect();
    }

    animals
        .iter()
        .flat_map(|animal| animal.photos.iter())
        .collect()
}

/// First photo of [`resolve_photos`], if any.
pub fn resolve_primary_photo<'a>(
    notice: &'a AdoptionNotice,
    animals: &'a [Animal],
) -> Option<&'a Photo> {
    notice
        .photos
        .first()
        .or_else(|| animals.iter().flat_map(|animal| animal.photos.iter()).next())
}
