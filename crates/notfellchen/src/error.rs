use crate::accounts::AccountError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::geo::GeoError;
use crate::moderation::ModerationError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Geo(GeoError),
    Catalog(CatalogError),
    Moderation(ModerationError),
    Account(AccountError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Geo(err) => write!(f, "geocoding error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Moderation(err) => write!(f, "moderation error: {}", err),
            AppError::Account(err) => write!(f, "account error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Geo(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Moderation(err) => Some(err),
            AppError::Account(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<GeoError> for AppError {
    fn from(value: GeoError) -> Self {
        Self::Geo(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ModerationError> for AppError {
    fn from(value: ModerationError) -> Self {
        Self::Moderation(value)
    }
}

impl From<AccountError> for AppError {
    fn from(value: AccountError) -> Self {
        Self::Account(value)
    }
}
