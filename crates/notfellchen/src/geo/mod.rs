//! Place resolution against Nominatim and great-circle distances.

pub mod directory;
pub mod distance;
pub mod nominatim;

pub use directory::{Location, LocationDirectory, LocationId, LocationRepository, LocateError};
pub use distance::{distance_km, Coordinates, EARTH_RADIUS_KM};
pub use nominatim::{
    geocoder_from_config, parse_search_response, GeoError, Geocoder, NominatimGeocoder,
    ResolvedPlace, StaticGeocoder, TUEBINGEN_FIXTURE,
};
