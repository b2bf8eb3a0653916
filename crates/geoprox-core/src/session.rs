// crates/geoprox-core/src/session.rs

//! # Session
//!
//! One logical user session: both datasets, the filter state, the loader's
//! per-country progress and the proximity settings, owned in one place.
//! Every operation is an explicit synchronous call; derived values
//! (visible facilities, buffer counts, statistics) are recomputed on demand
//! from the current state.

use crate::country::is_all;
use crate::error::{FilterError, Result};
use crate::filter::{FilterState, FilterStore, Transition};
use crate::loader::{load_facilities, CancelToken, CountryLoad, DataSource, LoaderConfig, SchoolLoader};
use crate::model::{FacilityRecord, FacilityType, SchoolRecord};
use crate::proximity::{BufferCounts, ProximityConfig, ProximityEngine};
use crate::stats::{country_stats_with, CountryStats};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

#[derive(Debug)]
pub struct Session<S: DataSource> {
    source: S,
    loader: SchoolLoader,
    engine: ProximityEngine,
    filter: FilterStore,
    facilities: Vec<FacilityRecord>,
    schools: Vec<SchoolRecord>,
    facilities_loaded: bool,
}

impl<S: DataSource> Session<S> {
    pub fn new(source: S, loader: &LoaderConfig, proximity: ProximityConfig) -> Self {
        Self {
            source,
            loader: SchoolLoader::new(loader),
            engine: ProximityEngine::new(proximity),
            filter: FilterStore::default(),
            facilities: Vec::new(),
            schools: Vec::new(),
            facilities_loaded: false,
        }
    }

    /// Session with default loader and proximity settings.
    pub fn with_source(source: S) -> Self {
        Self::new(source, &LoaderConfig::default(), ProximityConfig::default())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn facilities(&self) -> &[FacilityRecord] {
        &self.facilities
    }

    pub fn schools(&self) -> &[SchoolRecord] {
        &self.schools
    }

    pub fn filter_state(&self) -> &FilterState {
        self.filter.state()
    }

    pub fn engine(&self) -> &ProximityEngine {
        &self.engine
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.loader.cancel_token()
    }

    pub fn is_country_loaded(&self, iso3: &str) -> bool {
        self.loader.is_loaded(iso3)
    }

    /// Fetch the facilities dataset once. Later calls return the cached
    /// count without touching the source.
    pub fn load_facilities(&mut self) -> Result<usize> {
        if self.facilities_loaded {
            return Ok(self.facilities.len());
        }
        self.facilities = load_facilities(&self.source)?;
        self.facilities_loaded = true;
        Ok(self.facilities.len())
    }

    /// Append every school of `country` (display name or ISO3) to the
    /// session and return the schools this call added. Completed countries
    /// are never fetched again, so a repeat call returns an empty slice; on
    /// error the schools received so far stay in the session and a retry
    /// resumes.
    pub fn load_schools_for_country(&mut self, country: &str) -> Result<&[SchoolRecord]> {
        let before = self.schools.len();
        self.load_schools_report(country)?;
        Ok(&self.schools[before..])
    }

    /// Same as [`Session::load_schools_for_country`], reporting page and
    /// cache details instead of the records.
    pub fn load_schools_report(&mut self, country: &str) -> Result<CountryLoad> {
        self.loader
            .load_country(&self.source, country, &mut self.schools)
    }

    /// Select `country` and, unless it is "all", make sure its schools are
    /// loaded. The selection sticks even when loading fails.
    pub fn focus_country(&mut self, country: &str) -> Result<Option<CountryLoad>> {
        self.filter.set_selected_country(country, &self.facilities);
        if is_all(country) {
            return Ok(None);
        }
        let report = self.load_schools_report(country)?;
        info!(country, added = report.added, "country focused");
        Ok(Some(report))
    }

    pub fn set_selected_types(
        &mut self,
        types: impl IntoIterator<Item = FacilityType>,
    ) -> Transition<'_> {
        self.filter.set_selected_types(types, &self.facilities)
    }

    pub fn set_selected_country(&mut self, name: impl Into<String>) -> Transition<'_> {
        self.filter.set_selected_country(name, &self.facilities)
    }

    pub fn set_buffer_radius(&mut self, km: f64) -> std::result::Result<Transition<'_>, FilterError> {
        self.filter.set_buffer_radius(km, &self.facilities)
    }

    pub fn visible_facilities(&self) -> Vec<&FacilityRecord> {
        self.filter.visible_facilities(&self.facilities)
    }

    /// Every loaded school against the visible facilities at the current
    /// buffer radius. Schools are not narrowed by the country selection.
    pub fn buffer_counts(&self) -> BufferCounts {
        let visible = self.visible_facilities();
        self.engine
            .count(&visible, &self.schools, self.filter.state().buffer_radius_km)
    }

    /// Schools inside the current buffer union, one per identity key.
    pub fn schools_in_buffer(&self) -> Vec<&SchoolRecord> {
        let visible = self.visible_facilities();
        self.engine.schools_in_buffer(
            &visible,
            &self.schools,
            self.filter.state().buffer_radius_km,
        )
    }

    /// Fixed-radius statistics for `country`, ignoring the type filter and
    /// the live radius.
    pub fn country_stats(&self, country: &str) -> CountryStats {
        country_stats_with(&self.engine, country, &self.facilities, &self.schools)
    }

    /// Sorted distinct facility country names.
    pub fn countries(&self) -> Vec<&str> {
        self.facilities
            .iter()
            .map(|f| f.country_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Visible facilities per type. Types with no visible facility are absent.
    pub fn facility_type_counts(&self) -> BTreeMap<FacilityType, usize> {
        let mut counts = BTreeMap::new();
        for f in self.visible_facilities() {
            *counts.entry(f.facility_type).or_insert(0) += 1;
        }
        counts
    }
}
