use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn distance_km(self, other: Coordinates) -> f64 {
        distance_km(self, other)
    }
}

/// Great-circle distance between two points using the haversine formula.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const TUEBINGEN: Coordinates = Coordinates::new(48.4949904, 9.040330235970146);
    const ESSLINGEN: Coordinates = Coordinates::new(48.648333, 9.451111);

    #[test]
    fn stuttgart_area_distance_is_about_39_km() {
        let distance = distance_km(TUEBINGEN, ESSLINGEN);
        assert!((distance - 39.0).abs() < 1.0, "got {distance}");
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (TUEBINGEN, ESSLINGEN),
            (Coordinates::new(52.52, 13.405), Coordinates::new(-33.8688, 151.2093)),
            (Coordinates::new(0.0, 179.9), Coordinates::new(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn identical_points_are_zero_apart() {
        assert!(distance_km(TUEBINGEN, TUEBINGEN) < 1e-6);
        assert!(TUEBINGEN.distance_km(TUEBINGEN) < 1e-6);
    }

    #[test]
    fn antipodes_are_half_the_circumference_apart() {
        let distance = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance - half).abs() < 1e-6);
    }
}
