use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::photos;
use crate::accounts::UserId;
use crate::geo::{Location, LocationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoticeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimalId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotoId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganizationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub u64);

macro_rules! display_as_number {
    ($($id:ty),+) => {
        $(impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })+
    };
}

display_as_number!(NoticeId, AnimalId, PhotoId, SpeciesId, OrganizationId, CommentId);

/// Uploaded image. The file itself lives in external storage under `storage_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub title: String,
    pub alt_text: String,
    pub storage_key: String,
    pub uploaded_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F_N")]
    FemaleNeutered,
    #[serde(rename = "M_N")]
    MaleNeutered,
}

impl Sex {
    pub const fn code(self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
            Sex::FemaleNeutered => "F_N",
            Sex::MaleNeutered => "M_N",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
            Sex::FemaleNeutered => "neutered female",
            Sex::MaleNeutered => "neutered male",
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "F" | "female" => Ok(Sex::Female),
            "M" | "male" => Ok(Sex::Male),
            "F_N" | "female_neutered" => Ok(Sex::FemaleNeutered),
            "M_N" | "male_neutered" => Ok(Sex::MaleNeutered),
            other => Err(format!("unknown sex '{other}' (expected F, M, F_N or M_N)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueOrganization {
    pub id: OrganizationId,
    pub name: String,
    pub trusted: bool,
    pub location: LocationId,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub fediverse_profile: Option<String>,
    pub website: Option<String>,
}

/// Publication state. Notices from members without the publishing
/// capability wait for a moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeStatus {
    Active,
    AwaitingModeration,
}

impl NoticeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            NoticeStatus::Active => "active",
            NoticeStatus::AwaitingModeration => "awaiting_moderation",
        }
    }
}

/// A listing for one or more animals looking for a home. Animals point back
/// to their notice; `photos` holds the images attached to the notice itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionNotice {
    pub id: NoticeId,
    pub owner: UserId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDate,
    pub searching_since: NaiveDate,
    pub organization: Option<OrganizationId>,
    pub further_information: Option<String>,
    pub group_only: bool,
    pub photos: Vec<Photo>,
    pub location: Option<LocationId>,
    pub status: NoticeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub notice: NoticeId,
    pub name: String,
    pub species: SpeciesId,
    pub sex: Sex,
    pub date_of_birth: Option<NaiveDate>,
    pub description: Option<String>,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub notice: NoticeId,
    pub author: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A notice with everything hanging off it, as read for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeDetail {
    pub notice: AdoptionNotice,
    pub animals: Vec<Animal>,
    pub comments: Vec<Comment>,
    pub location: Option<Location>,
}

impl NoticeDetail {
    pub fn photos(&self) -> Vec<&Photo> {
        photos::resolve_photos(&self.notice, &self.animals)
    }

    pub fn primary_photo(&self) -> Option<&Photo> {
        photos::resolve_primary_photo(&self.notice, &self.animals)
    }
}

/// Search hit: the notice, its display photo and, for place searches, the
/// distance from the searched place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeSummary {
    pub notice: AdoptionNotice,
    pub primary_photo: Option<Photo>,
    pub distance_km: Option<f64>,
}
