// crates/geoprox-core/src/geo.rs

//! # Distance Utility
//!
//! Great-circle math on plain `(lat, lng)` pairs in degrees.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for every distance in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude on the sphere above.
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `Some` only for finite coordinates inside the valid lat/lng ranges.
    pub fn checked(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    #[inline]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Haversine great-circle distance in kilometres.
///
/// Total over finite inputs. The intermediate term is clamped to `[0, 1]`
/// so rounding can't push `asin` out of its domain for antipodal points.
///
/// ```rust
/// use geoprox_core::geo::haversine_km;
///
/// assert_eq!(haversine_km(34.5, 69.2, 34.5, 69.2), 0.0);
/// let d = haversine_km(51.5074, -0.1278, 48.8566, 2.3522);
/// assert!((d - 343.5).abs() < 1.0);
/// ```
#[inline]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Latitude/longitude window guaranteed to contain every point within
/// `radius_km` of `center`.
///
/// `lng_span` is `None` when the window wraps the whole parallel (near the
/// poles or for very large radii).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    pub min_lat: f64,
    pub max_lat: f64,
    pub lng_span: Option<(f64, f64)>,
}

impl SearchWindow {
    pub fn around(center: &GeoPoint, radius_km: f64) -> Self {
        let angular = radius_km / EARTH_RADIUS_KM;
        let delta_lat = angular.to_degrees();
        let min_lat = center.lat - delta_lat;
        let max_lat = center.lat + delta_lat;

        if min_lat <= -90.0 || max_lat >= 90.0 || angular >= std::f64::consts::FRAC_PI_2 {
            return Self {
                min_lat: min_lat.max(-90.0),
                max_lat: max_lat.min(90.0),
                lng_span: None,
            };
        }

        // Widest longitude offset reached by the circle at this latitude.
        let ratio = angular.sin() / center.lat.to_radians().cos();
        let lng_span = if ratio >= 1.0 {
            None
        } else {
            let delta_lng = ratio.asin().to_degrees();
            Some((center.lng - delta_lng, center.lng + delta_lng))
        };

        Self {
            min_lat,
            max_lat,
            lng_span,
        }
    }
}
