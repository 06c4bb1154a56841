use std::fmt::Debug;

use reqwest::header::{HeaderMap, HeaderValue, FROM};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::{debug, instrument, warn};

use super::distance::Coordinates;
use crate::config::GeocodingConfig;

/// First hit of a place search, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub place_id: u64,
    pub osm_id: Option<u64>,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub display_name: String,
}

impl ResolvedPlace {
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("location could not be resolved for '{query}': {reason}")]
    LookupFailure { query: String, reason: String },
    #[error("geocoder client unavailable: {0}")]
    Client(String),
}

impl GeoError {
    fn lookup(query: &str, reason: impl Into<String>) -> Self {
        Self::LookupFailure {
            query: query.to_string(),
            reason: reason.into(),
        }
    }
}

/// Resolves free text to a place. Each call is an independent lookup.
pub trait Geocoder: Debug + Send + Sync {
    fn resolve(&self, place_text: &str) -> Result<ResolvedPlace, GeoError>;
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    place_id: Option<Value>,
    osm_id: Option<Value>,
    lat: Option<Value>,
    lon: Option<Value>,
    name: Option<String>,
    display_name: Option<String>,
}

/// Nominatim sends numbers as JSON strings in `jsonv2`; accept either.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::String(raw) => raw.trim().parse().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

fn identifier(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::String(raw) => raw.trim().parse().ok(),
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Parses a search response body, keeping only the first hit.
pub fn parse_search_response(query: &str, body: &str) -> Result<ResolvedPlace, GeoError> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)
        .map_err(|err| GeoError::lookup(query, format!("malformed response: {err}")))?;

    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeoError::lookup(query, "no results"))?;

    let place_id = identifier(hit.place_id.as_ref())
        .ok_or_else(|| GeoError::lookup(query, "result is missing place_id"))?;
    let latitude = number(hit.lat.as_ref())
        .filter(|lat| (-90.0..=90.0).contains(lat))
        .ok_or_else(|| GeoError::lookup(query, "result has no valid lat"))?;
    let longitude = number(hit.lon.as_ref())
        .filter(|lon| (-180.0..=180.0).contains(lon))
        .ok_or_else(|| GeoError::lookup(query, "result has no valid lon"))?;

    let name = non_blank(hit.name);
    let display_name = non_blank(hit.display_name);
    let (name, display_name) = match (name, display_name) {
        (Some(name), Some(display_name)) => (name, display_name),
        (Some(name), None) => (name.clone(), name),
        (None, Some(display_name)) => (display_name.clone(), display_name),
        (None, None) => {
            return Err(GeoError::lookup(
                query,
                "result has neither name nor display_name",
            ))
        }
    };

    Ok(ResolvedPlace {
        place_id,
        osm_id: identifier(hit.osm_id.as_ref()),
        latitude,
        longitude,
        name,
        display_name,
    })
}

fn checked_query(place_text: &str) -> Result<&str, GeoError> {
    let query = place_text.trim();
    if query.is_empty() {
        return Err(GeoError::lookup(query, "empty query"));
    }
    Ok(query)
}

/// Blocking client for the Nominatim search endpoint. Owns its runtime so
/// synchronous workflows never see the async transport.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    runtime: Runtime,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeoError> {
        let mut headers = HeaderMap::new();
        let from = HeaderValue::from_str(&config.contact)
            .map_err(|err| GeoError::Client(format!("invalid contact header: {err}")))?;
        headers.insert(FROM, from);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|err| GeoError::Client(err.to_string()))?;
        let runtime = Runtime::new().map_err(|err| GeoError::Client(err.to_string()))?;

        Ok(Self {
            client,
            runtime,
            endpoint: config.endpoint.clone(),
        })
    }

    async fn fetch(&self, query: &str) -> Result<String, GeoError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "jsonv2")])
            .send()
            .await
            .map_err(|err| GeoError::lookup(query, format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::lookup(
                query,
                format!("search endpoint answered {status}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|err| GeoError::lookup(query, format!("unreadable response: {err}")))
    }
}

impl Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    fn resolve(&self, place_text: &str) -> Result<ResolvedPlace, GeoError> {
        let query = checked_query(place_text)?;
        debug!(endpoint = %self.endpoint, "querying place search");

        let result = self
            .runtime
            .block_on(self.fetch(query))
            .and_then(|body| parse_search_response(query, &body));

        match &result {
            Ok(place) => debug!(
                place_id = place.place_id,
                latitude = place.latitude,
                longitude = place.longitude,
                "place resolved"
            ),
            Err(err) => warn!(error = %err, "place lookup failed"),
        }
        result
    }
}

/// Answer returned by [`StaticGeocoder::default`]: postcode 72072 in Tübingen.
pub const TUEBINGEN_FIXTURE: &str = r#"[{"place_id":138181499,"licence":"Data © OpenStreetMap contributors, ODbL 1.0. http://osm.org/copyright","osm_type":"relation","osm_id":1247237,"lat":"48.4949904","lon":"9.040330235970146","category":"boundary","type":"postal_code","place_rank":21,"importance":0.12006895017929346,"addresstype":"postcode","name":"72072","display_name":"72072, Derendingen, Tübingen, Landkreis Tübingen, Baden-Württemberg, Deutschland","boundingbox":["48.4949404","48.4950404","9.0402802","9.0403802"]}]"#;

/// Offline geocoder that parses a fixed response body for every query.
/// Used in development so no requests reach the public service.
#[derive(Debug, Clone)]
pub struct StaticGeocoder {
    payload: String,
}

impl StaticGeocoder {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl Default for StaticGeocoder {
    fn default() -> Self {
        Self::with_payload(TUEBINGEN_FIXTURE)
    }
}

impl Geocoder for StaticGeocoder {
    fn resolve(&self, place_text: &str) -> Result<ResolvedPlace, GeoError> {
        let query = checked_query(place_text)?;
        parse_search_response(query, &self.payload)
    }
}

/// Picks the geocoder matching the configuration.
pub fn geocoder_from_config(config: &GeocodingConfig) -> Result<Box<dyn Geocoder>, GeoError> {
    if config.offline {
        Ok(Box::new(StaticGeocoder::default()))
    } else {
        Ok(Box::new(NominatimGeocoder::new(config)?))
    }
}
