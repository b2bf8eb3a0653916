// crates/geoprox-core/src/traits.rs
use crate::geo::GeoPoint;

/// Anything with a position on the globe.
///
/// Implemented by both record types and by references to them, so the
/// proximity code takes `&[FacilityRecord]` and `&[&FacilityRecord]` alike.
pub trait Located {
    fn point(&self) -> GeoPoint;
}

impl<T: Located + ?Sized> Located for &T {
    #[inline]
    fn point(&self) -> GeoPoint {
        (**self).point()
    }
}

impl Located for GeoPoint {
    #[inline]
    fn point(&self) -> GeoPoint {
        *self
    }
}

/// Records carrying a stable identifier.
pub trait Identified {
    fn record_id(&self) -> &str;
}

impl<T: Identified + ?Sized> Identified for &T {
    #[inline]
    fn record_id(&self) -> &str {
        (**self).record_id()
    }
}

impl Identified for crate::model::SchoolRecord {
    #[inline]
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Identified for crate::model::FacilityRecord {
    #[inline]
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Strategy seam for "which schools lie within `radius_km` of any facility".
///
/// Implementations must agree exactly: the result is a per-school hit mask
/// aligned with `schools`, decided by haversine distance `<= radius_km`.
pub trait ProximitySearch {
    fn in_buffer_mask<F: Located, S: Located>(
        &self,
        facilities: &[F],
        schools: &[S],
        radius_km: f64,
    ) -> Vec<bool>;
}
