use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{OrganizationId, Sex, SpeciesId};

const MAX_NAME_LEN: usize = 200;
const MAX_ALT_TEXT_LEN: usize = 2000;
pub const MAX_ANIMALS_PER_NOTICE: u8 = 30;

/// Validation errors raised before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be an http(s) link, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },
    #[error("number of animals must be between 1 and 30, got {0}")]
    AnimalCount(u8),
}

fn required(field: &'static str, value: &str, max: usize) -> Result<(), FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Missing(field));
    }
    if trimmed.chars().count() > max {
        return Err(FormError::TooLong { field, max });
    }
    Ok(())
}

fn optional_url(field: &'static str, value: Option<&str>) -> Result<(), FormError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(());
    };
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(FormError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

/// Blank optional text is stored as absent.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Fields a user fills in to create a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeSubmission {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub searching_since: NaiveDate,
    #[serde(default)]
    pub group_only: bool,
    #[serde(default)]
    pub further_information: Option<String>,
    #[serde(default)]
    pub organization: Option<OrganizationId>,
    /// Free-text place, resolved through the geocoder when present.
    #[serde(default)]
    pub location_string: Option<String>,
}

impl NoticeSubmission {
    pub fn validate(&self) -> Result<(), FormError> {
        required("name", &self.name, MAX_NAME_LEN)?;
        optional_url("further_information", self.further_information.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalSubmission {
    pub name: String,
    pub species: SpeciesId,
    pub sex: Sex,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl AnimalSubmission {
    pub fn validate(&self) -> Result<(), FormError> {
        required("name", &self.name, MAX_NAME_LEN)
    }
}

/// Notice form that also creates `num_animals` identical animals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeWithAnimalsSubmission {
    #[serde(flatten)]
    pub notice: NoticeSubmission,
    pub species: SpeciesId,
    pub sex: Sex,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub num_animals: u8,
}

impl NoticeWithAnimalsSubmission {
    pub fn validate(&self) -> Result<(), FormError> {
        self.notice.validate()?;
        if self.num_animals == 0 || self.num_animals > MAX_ANIMALS_PER_NOTICE {
            return Err(FormError::AnimalCount(self.num_animals));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhoto {
    pub title: String,
    pub alt_text: String,
    pub storage_key: String,
}

impl NewPhoto {
    pub fn validate(&self) -> Result<(), FormError> {
        required("title", &self.title, MAX_NAME_LEN)?;
        required("storage_key", &self.storage_key, MAX_NAME_LEN)?;
        if self.alt_text.chars().count() > MAX_ALT_TEXT_LEN {
            return Err(FormError::TooLong {
                field: "alt_text",
                max: MAX_ALT_TEXT_LEN,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSubmission {
    pub name: String,
    #[serde(default)]
    pub trusted: bool,
    pub location_string: String,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub fediverse_profile: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl OrganizationSubmission {
    pub fn validate(&self) -> Result<(), FormError> {
        required("name", &self.name, MAX_NAME_LEN)?;
        required("location_string", &self.location_string, MAX_NAME_LEN)?;
        optional_url("instagram", self.instagram.as_deref())?;
        optional_url("facebook", self.facebook.as_deref())?;
        optional_url("fediverse_profile", self.fediverse_profile.as_deref())?;
        optional_url("website", self.website.as_deref())
    }
}
