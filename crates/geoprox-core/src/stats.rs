// crates/geoprox-core/src/stats.rs

//! # Country Statistics Aggregator
//!
//! Fixed-radius breakdowns for one country, independent of the live buffer
//! radius and of the facility-type filter.

use crate::country::{is_all, resolve};
use crate::model::{FacilityRecord, SchoolRecord};
use crate::proximity::ProximityEngine;
use serde::{Deserialize, Serialize};

/// Reference radii reported by [`country_stats`].
pub const REFERENCE_RADII_KM: [f64; 3] = [5.0, 10.0, 50.0];

/// Aggregate counts for one country. Each `within_*` is a count of schools,
/// to be read against `total_schools`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountryStats {
    pub total_schools: usize,
    pub total_facilities: usize,
    pub within_5km: usize,
    pub within_10km: usize,
    pub within_50km: usize,
}

impl CountryStats {
    /// Share of schools within `within` (0.0 when there are no schools).
    pub fn ratio(&self, within: usize) -> f64 {
        if self.total_schools == 0 {
            0.0
        } else {
            within as f64 / self.total_schools as f64
        }
    }
}

/// Statistics for `country_display_name` using the default engine.
pub fn country_stats(
    country_display_name: &str,
    all_facilities: &[FacilityRecord],
    all_schools: &[SchoolRecord],
) -> CountryStats {
    country_stats_with(
        &ProximityEngine::default(),
        country_display_name,
        all_facilities,
        all_schools,
    )
}

/// Statistics for one country.
///
/// Facilities are matched by display name, schools by the ISO3 code the
/// display name resolves to. [`ALL_COUNTRIES`](crate::country::ALL_COUNTRIES)
/// scopes to the whole dataset.
pub fn country_stats_with(
    engine: &ProximityEngine,
    country_display_name: &str,
    all_facilities: &[FacilityRecord],
    all_schools: &[SchoolRecord],
) -> CountryStats {
    let (facilities, schools): (Vec<&FacilityRecord>, Vec<&SchoolRecord>) =
        if is_all(country_display_name) {
            (all_facilities.iter().collect(), all_schools.iter().collect())
        } else {
            let iso3 = resolve(country_display_name);
            (
                all_facilities
                    .iter()
                    .filter(|f| f.country_name == country_display_name)
                    .collect(),
                all_schools
                    .iter()
                    .filter(|s| s.country_code.eq_ignore_ascii_case(&iso3))
                    .collect(),
            )
        };

    let [within_5km, within_10km, within_50km] =
        REFERENCE_RADII_KM.map(|r| engine.count(&facilities, &schools, r).in_count);

    CountryStats {
        total_schools: schools.len(),
        total_facilities: facilities.len(),
        within_5km,
        within_10km,
        within_50km,
    }
}
