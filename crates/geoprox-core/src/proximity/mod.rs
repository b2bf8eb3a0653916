// crates/geoprox-core/src/proximity/mod.rs

//! # Proximity Engine
//!
//! Counts schools inside the union of the visible facilities' buffer zones.
//! Everything here is a pure function of its inputs; callers rerun it after
//! every filter, radius or dataset change.

pub mod grid;

pub use grid::{GridSearch, SchoolGrid};

use crate::traits::{Identified, Located, ProximitySearch};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How schools are de-duplicated when counting "in buffer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// Same `(lat, lng)` = same school. Co-located schools count once.
    #[default]
    Coordinates,
    /// Each record id counts separately, even when co-located.
    RecordId,
}

/// Which [`ProximitySearch`] implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// O(F x S) pairwise scan.
    #[default]
    BruteForce,
    /// Buckets schools into a grid first. Same results, scales with S.
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProximityConfig {
    #[serde(default)]
    pub identity: IdentityPolicy,
    #[serde(default)]
    pub strategy: Strategy,
}

/// In/out split of the school set. `in_count + out_count == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BufferCounts {
    pub in_count: usize,
    pub out_count: usize,
}

impl BufferCounts {
    pub fn total(&self) -> usize {
        self.in_count + self.out_count
    }
}

/// Pairwise haversine scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl ProximitySearch for BruteForce {
    fn in_buffer_mask<F: Located, S: Located>(
        &self,
        facilities: &[F],
        schools: &[S],
        radius_km: f64,
    ) -> Vec<bool> {
        let mut mask = vec![false; schools.len()];
        for facility in facilities {
            let center = facility.point();
            for (hit, school) in mask.iter_mut().zip(schools) {
                if !*hit && center.distance_km(&school.point()) <= radius_km {
                    *hit = true;
                }
            }
        }
        mask
    }
}

/// Identity under which two schools are considered the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SchoolKey<'a> {
    Coordinates(u64, u64),
    Id(&'a str),
}

impl<'a> SchoolKey<'a> {
    fn of<S: Located + Identified>(school: &'a S, policy: IdentityPolicy) -> Self {
        match policy {
            IdentityPolicy::Coordinates => {
                let p = school.point();
                SchoolKey::Coordinates(coord_bits(p.lat), coord_bits(p.lng))
            }
            IdentityPolicy::RecordId => SchoolKey::Id(school.record_id()),
        }
    }
}

/// `-0.0` and `0.0` are the same coordinate.
#[inline]
fn coord_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProximityEngine {
    config: ProximityConfig,
}

impl ProximityEngine {
    pub fn new(config: ProximityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ProximityConfig {
        self.config
    }

    /// Per-school hit mask, aligned with `schools`.
    pub fn in_buffer_mask<F: Located, S: Located>(
        &self,
        facilities: &[F],
        schools: &[S],
        radius_km: f64,
    ) -> Vec<bool> {
        match self.config.strategy {
            Strategy::BruteForce => BruteForce.in_buffer_mask(facilities, schools, radius_km),
            Strategy::Grid => GridSearch.in_buffer_mask(facilities, schools, radius_km),
        }
    }

    /// Schools within `radius_km` of at least one facility, one per identity
    /// key, in dataset order.
    pub fn schools_in_buffer<'s, F, S>(
        &self,
        facilities: &[F],
        schools: &'s [S],
        radius_km: f64,
    ) -> Vec<&'s S>
    where
        F: Located,
        S: Located + Identified,
    {
        let mask = self.in_buffer_mask(facilities, schools, radius_km);
        let mut seen = HashSet::new();
        schools
            .iter()
            .zip(mask)
            .filter(|(school, hit)| *hit && seen.insert(SchoolKey::of(*school, self.config.identity)))
            .map(|(school, _)| school)
            .collect()
    }

    /// Count schools in and out of the buffer union.
    ///
    /// `out_count` is `schools.len() - in_count`, so under
    /// [`IdentityPolicy::Coordinates`] a co-located duplicate of an in-buffer
    /// school lands on the "out" side.
    pub fn count<F, S>(&self, facilities: &[F], schools: &[S], radius_km: f64) -> BufferCounts
    where
        F: Located,
        S: Located + Identified,
    {
        let in_count = self.schools_in_buffer(facilities, schools, radius_km).len();
        BufferCounts {
            in_count,
            out_count: schools.len() - in_count,
        }
    }
}

/// Brute-force count with coordinate identity.
pub fn count_schools_in_buffer<F, S>(facilities: &[F], schools: &[S], radius_km: f64) -> BufferCounts
where
    F: Located,
    S: Located + Identified,
{
    ProximityEngine::default().count(facilities, schools, radius_km)
}
