use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_GEO_API_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_GEO_CONTACT: &str = "info@notfellchen.org";
const DEFAULT_GEO_TIMEOUT_SECS: u64 = 8;
const MAX_GEO_TIMEOUT_SECS: u64 = 60;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub geocoding: GeocodingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let endpoint = env::var("GEO_API_URL").unwrap_or_else(|_| DEFAULT_GEO_API_URL.to_string());
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint { value: endpoint });
        }

        let contact = env::var("GEO_CONTACT").unwrap_or_else(|_| DEFAULT_GEO_CONTACT.to_string());

        let timeout_secs = match env::var("GEO_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| (1..=MAX_GEO_TIMEOUT_SECS).contains(secs))
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_GEO_TIMEOUT_SECS,
        };

        // Nominatim is only contacted for real in production unless asked otherwise.
        let offline = match env::var("GEO_OFFLINE") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "GEO_OFFLINE",
                value: raw,
            })?,
            Err(_) => environment != AppEnvironment::Production,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            geocoding: GeocodingConfig {
                endpoint,
                contact,
                user_agent: default_user_agent(),
                timeout: Duration::from_secs(timeout_secs),
                offline,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn default_user_agent() -> String {
    format!("Notfellchen {}", env!("CARGO_PKG_VERSION"))
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Settings for the external place search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodingConfig {
    pub endpoint: String,
    pub contact: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub offline: bool,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEO_API_URL.to_string(),
            contact: DEFAULT_GEO_CONTACT.to_string(),
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(DEFAULT_GEO_TIMEOUT_SECS),
            offline: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout,
    InvalidEndpoint { value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout => write!(
                f,
                "GEO_TIMEOUT_SECS must be a whole number between 1 and {MAX_GEO_TIMEOUT_SECS}"
            ),
            ConfigError::InvalidEndpoint { value } => {
                write!(f, "GEO_API_URL must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean flag, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
